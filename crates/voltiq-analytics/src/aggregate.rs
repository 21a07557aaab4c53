//! Totals and group-by rollups over service profitability rows.

use std::collections::HashMap;

use serde::Serialize;
use voltiq_core::ServiceProfitabilityRecord;

/// Portfolio-wide totals across every service row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalMetrics {
    pub total_projects: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    /// `total_profit / total_cost * 100`, or `0` when there is no cost.
    pub overall_margin: f64,
}

/// Revenue, cost and profit rolled up per client type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTypeProfitability {
    pub client_type: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub project_count: f64,
    pub margin: f64,
}

/// One category in a cost Pareto, in descending cost order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoEntry {
    pub name: String,
    pub cost: f64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
}

/// Cost-to-revenue ratio for a single service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCostRatio {
    pub name: String,
    pub ratio: f64,
}

/// `profit / cost * 100`, or `0` when there is no cost.
pub(crate) fn margin_pct(profit: f64, cost: f64) -> f64 {
    if cost == 0.0 {
        0.0
    } else {
        profit / cost * 100.0
    }
}

/// Sum project count, revenue, cost and profit across all records and derive
/// the overall margin.
///
/// An empty slice yields all zeros.
#[must_use]
pub fn calculate_total_metrics(records: &[ServiceProfitabilityRecord]) -> TotalMetrics {
    let mut totals = records.iter().fold(TotalMetrics::default(), |mut acc, r| {
        acc.total_projects += r.project_count;
        acc.total_revenue += r.total_revenue;
        acc.total_cost += r.total_cost;
        acc.total_profit += r.total_profit;
        acc
    });
    totals.overall_margin = margin_pct(totals.total_profit, totals.total_cost);
    totals
}

/// Group records by client type and compute a margin per group.
///
/// Missing client types are grouped under `"Unknown"`. Groups are returned in
/// descending margin order; equal margins keep first-appearance order.
#[must_use]
pub fn calculate_client_type_profitability(
    records: &[ServiceProfitabilityRecord],
) -> Vec<ClientTypeProfitability> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ClientTypeProfitability> = Vec::new();

    for r in records {
        let key = r.client_type.as_deref().unwrap_or("Unknown");
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(ClientTypeProfitability {
                client_type: key.to_string(),
                revenue: 0.0,
                cost: 0.0,
                profit: 0.0,
                project_count: 0.0,
                margin: 0.0,
            });
            groups.len() - 1
        });
        let g = &mut groups[slot];
        g.revenue += r.total_revenue;
        g.cost += r.total_cost;
        g.profit += r.total_profit;
        g.project_count += r.project_count;
    }

    for g in &mut groups {
        g.margin = margin_pct(g.profit, g.cost);
    }
    groups.sort_by(|a, b| b.margin.total_cmp(&a.margin));
    groups
}

/// Build a cost Pareto from service rows: cost summed per service name,
/// sorted descending, with each group's share and the running cumulative share.
///
/// Returns an empty Vec when total cost is zero so no NaN shares are produced.
#[must_use]
pub fn get_material_cost_pareto(records: &[ServiceProfitabilityRecord]) -> Vec<ParetoEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();

    for r in records {
        let key = r.service_name.as_deref().unwrap_or("Other");
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key.to_string(), 0.0));
            groups.len() - 1
        });
        groups[slot].1 += r.total_cost;
    }

    let total: f64 = groups.iter().map(|(_, cost)| cost).sum();
    if total == 0.0 {
        return Vec::new();
    }

    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Cumulative share comes from the running cost, not from summing rounded
    // shares, so an exact 80 % boundary stays at 80.
    let mut running = 0.0;
    groups
        .into_iter()
        .map(|(name, cost)| {
            running += cost;
            ParetoEntry {
                name,
                cost,
                percentage: cost * 100.0 / total,
                cumulative_percentage: running * 100.0 / total,
            }
        })
        .collect()
}

/// Portfolio cost-to-revenue ratio (lower is better), `0` when there is no revenue.
#[must_use]
pub fn cost_to_revenue_ratio(metrics: &TotalMetrics) -> f64 {
    if metrics.total_revenue == 0.0 {
        0.0
    } else {
        metrics.total_cost / metrics.total_revenue
    }
}

/// Per-service cost-to-revenue ratios, most efficient first.
///
/// Services without revenue are skipped; their ratio is undefined.
#[must_use]
pub fn service_cost_ratios(records: &[ServiceProfitabilityRecord]) -> Vec<ServiceCostRatio> {
    let mut ratios: Vec<ServiceCostRatio> = records
        .iter()
        .filter(|r| r.total_revenue != 0.0)
        .map(|r| ServiceCostRatio {
            name: r.display_name().to_string(),
            ratio: r.total_cost / r.total_revenue,
        })
        .collect();
    ratios.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));
    ratios
}
