//! Row shapes for the service charts and "top N" cards.
//!
//! Service rows arrive from the API already sorted by profit, so the `top_*`
//! helpers slice rather than sort unless noted.

use serde::Serialize;
use voltiq_core::ServiceProfitabilityRecord;

pub const DEFAULT_TOP_SERVICES: usize = 5;
pub const DEFAULT_CHART_LIMIT: usize = 10;

/// One bar group in the revenue/cost/profit chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChartRow {
    pub name: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub margin: f64,
    pub projects: f64,
    pub cumulative_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginHighlight {
    pub name: String,
    pub margin: f64,
}

impl MarginHighlight {
    fn from_record(r: &ServiceProfitabilityRecord) -> Self {
        Self {
            name: r.display_name().to_string(),
            margin: r.avg_profit_margin_pct,
        }
    }
}

/// The first `n` services in API order.
#[must_use]
pub fn get_top_services(
    records: &[ServiceProfitabilityRecord],
    n: usize,
) -> &[ServiceProfitabilityRecord] {
    &records[..n.min(records.len())]
}

#[must_use]
pub fn prepare_chart_data(
    records: &[ServiceProfitabilityRecord],
    limit: usize,
) -> Vec<ServiceChartRow> {
    get_top_services(records, limit)
        .iter()
        .map(|r| ServiceChartRow {
            name: r.display_name().to_string(),
            revenue: r.total_revenue,
            cost: r.total_cost,
            profit: r.total_profit,
            margin: r.avg_profit_margin_pct,
            projects: r.project_count,
            cumulative_percentage: r.cumulative_percentage,
        })
        .collect()
}

fn first_n_by(
    records: &[ServiceProfitabilityRecord],
    n: usize,
    value: impl Fn(&ServiceProfitabilityRecord) -> f64,
) -> Vec<NameValue> {
    get_top_services(records, n)
        .iter()
        .map(|r| NameValue {
            name: r.display_name().to_string(),
            value: value(r),
        })
        .collect()
}

/// Project counts for the first `n` services.
#[must_use]
pub fn top_by_volume(records: &[ServiceProfitabilityRecord], n: usize) -> Vec<NameValue> {
    first_n_by(records, n, |r| r.project_count)
}

/// Revenue for the first `n` services.
#[must_use]
pub fn top_by_revenue(records: &[ServiceProfitabilityRecord], n: usize) -> Vec<NameValue> {
    first_n_by(records, n, |r| r.total_revenue)
}

/// The `n` services with the highest average margin. Sorts a copy; equal
/// margins keep API order.
#[must_use]
pub fn top_margin_services(
    records: &[ServiceProfitabilityRecord],
    n: usize,
) -> Vec<MarginHighlight> {
    let mut sorted: Vec<&ServiceProfitabilityRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.avg_profit_margin_pct.total_cmp(&a.avg_profit_margin_pct));
    sorted
        .into_iter()
        .take(n)
        .map(MarginHighlight::from_record)
        .collect()
}

/// Most and least profitable services by average margin, `None` for no input.
///
/// On equal margins the earliest record wins on both ends.
#[must_use]
pub fn profitability_extremes(
    records: &[ServiceProfitabilityRecord],
) -> Option<(MarginHighlight, MarginHighlight)> {
    let first = records.first()?;
    let (best, worst) = records.iter().skip(1).fold((first, first), |(best, worst), r| {
        let best = if r.avg_profit_margin_pct > best.avg_profit_margin_pct { r } else { best };
        let worst = if r.avg_profit_margin_pct < worst.avg_profit_margin_pct { r } else { worst };
        (best, worst)
    });
    Some((
        MarginHighlight::from_record(best),
        MarginHighlight::from_record(worst),
    ))
}

/// Project count per service for the service-type pie chart.
#[must_use]
pub fn service_type_distribution(records: &[ServiceProfitabilityRecord]) -> Vec<NameValue> {
    first_n_by(records, records.len(), |r| r.project_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str, revenue: f64, margin: f64, count: f64) -> ServiceProfitabilityRecord {
        ServiceProfitabilityRecord {
            service_name: Some(name.to_string()),
            total_revenue: revenue,
            total_cost: revenue * 0.7,
            total_profit: revenue * 0.3,
            avg_profit_margin_pct: margin,
            project_count: count,
            ..Default::default()
        }
    }

    fn sample() -> Vec<ServiceProfitabilityRecord> {
        vec![
            service("Commercial Wiring", 500_000.0, 28.0, 12.0),
            service("Panel Upgrade", 320_000.0, 35.5, 20.0),
            service("Lighting Retrofit", 210_000.0, 18.0, 9.0),
            service("Generator Install", 150_000.0, 35.5, 4.0),
            service("EV Charger", 90_000.0, 12.0, 15.0),
            service("Inspection", 30_000.0, 41.0, 30.0),
        ]
    }

    #[test]
    fn top_services_defaults_to_five() {
        let records = sample();
        let top = get_top_services(&records, DEFAULT_TOP_SERVICES);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].display_name(), "Commercial Wiring");
        assert_eq!(get_top_services(&records, 50).len(), 6);
        assert!(get_top_services(&[], 5).is_empty());
    }

    #[test]
    fn chart_rows_map_fields() {
        let rows = prepare_chart_data(&sample(), DEFAULT_CHART_LIMIT);
        assert_eq!(rows.len(), 6);
        let row = &rows[1];
        assert_eq!(row.name, "Panel Upgrade");
        assert_eq!(row.revenue, 320_000.0);
        assert_eq!(row.margin, 35.5);
        assert_eq!(row.projects, 20.0);
    }

    #[test]
    fn chart_rows_truncate_to_limit() {
        assert_eq!(prepare_chart_data(&sample(), 2).len(), 2);
    }

    #[test]
    fn top_cards_take_api_order() {
        let volume = top_by_volume(&sample(), 3);
        let names: Vec<&str> = volume.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Commercial Wiring", "Panel Upgrade", "Lighting Retrofit"]);
        assert_eq!(volume[1].value, 20.0);

        let revenue = top_by_revenue(&sample(), 1);
        assert_eq!(revenue[0].value, 500_000.0);
    }

    #[test]
    fn top_margin_sorts_descending_with_stable_ties() {
        let top = top_margin_services(&sample(), 3);
        let names: Vec<&str> = top.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Inspection", "Panel Upgrade", "Generator Install"]);
    }

    #[test]
    fn extremes_pick_best_and_worst() {
        let (best, worst) = profitability_extremes(&sample()).unwrap();
        assert_eq!(best.name, "Inspection");
        assert_eq!(best.margin, 41.0);
        assert_eq!(worst.name, "EV Charger");
        assert_eq!(worst.margin, 12.0);
    }

    #[test]
    fn extremes_of_empty_is_none() {
        assert!(profitability_extremes(&[]).is_none());
    }

    #[test]
    fn extremes_of_single_record_are_the_same() {
        let records = vec![service("Only", 1.0, 5.0, 1.0)];
        let (best, worst) = profitability_extremes(&records).unwrap();
        assert_eq!(best, worst);
    }

    #[test]
    fn distribution_covers_every_service() {
        let dist = service_type_distribution(&sample());
        assert_eq!(dist.len(), 6);
        assert_eq!(dist[5].name, "Inspection");
        assert_eq!(dist[5].value, 30.0);
    }
}
