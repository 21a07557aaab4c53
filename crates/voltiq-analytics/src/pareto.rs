//! 80/20 selection of the "vital few" services and cost drivers, plus the
//! chart rows behind the Pareto combo chart.
//!
//! Nothing here sorts: inputs are expected in descending cost/profit order,
//! which is how both the API and [`crate::get_material_cost_pareto`] return them.

use voltiq_core::{MaterialCostRecord, ServiceProfitabilityRecord};

use crate::aggregate::{get_material_cost_pareto, ParetoEntry};

/// Cumulative share at or below which an entry belongs to the vital few.
pub const PARETO_THRESHOLD_PCT: f64 = 80.0;

/// Services within the first 80 % of cumulative share.
///
/// A zero `cumulative_percentage` means the API did not rank the row, so it
/// is excluded along with everything above the threshold.
#[must_use]
pub fn get_pareto_services(
    records: &[ServiceProfitabilityRecord],
) -> Vec<&ServiceProfitabilityRecord> {
    records
        .iter()
        .filter(|r| {
            r.cumulative_percentage > 0.0 && r.cumulative_percentage <= PARETO_THRESHOLD_PCT
        })
        .collect()
}

/// Pareto entries within the first 80 % of cumulative cost.
#[must_use]
pub fn get_top_cost_drivers(entries: &[ParetoEntry]) -> Vec<&ParetoEntry> {
    entries
        .iter()
        .filter(|e| e.cumulative_percentage <= PARETO_THRESHOLD_PCT)
        .collect()
}

/// Service-derived Pareto rows for the chart, truncated to `limit`.
///
/// Used when the API returns no server-side material Pareto.
#[must_use]
pub fn pareto_chart_data(
    records: &[ServiceProfitabilityRecord],
    limit: usize,
) -> Vec<ParetoEntry> {
    let mut entries = get_material_cost_pareto(records);
    entries.truncate(limit);
    entries
}

/// Shape the server-computed material Pareto into chart rows, truncated to `limit`.
///
/// Shares are taken as reported by the API and not recomputed.
#[must_use]
pub fn material_pareto_chart_data(
    materials: &[MaterialCostRecord],
    limit: usize,
) -> Vec<ParetoEntry> {
    materials
        .iter()
        .take(limit)
        .map(|m| ParetoEntry {
            name: m.category.clone(),
            cost: m.total_cost,
            percentage: m.percentage,
            cumulative_percentage: m.cumulative_percentage,
        })
        .collect()
}
