//! CSV export of service profitability rows.

use csv::{Terminator, WriterBuilder};
use voltiq_core::ServiceProfitabilityRecord;

use crate::error::ExportError;

pub const CSV_HEADERS: [&str; 10] = [
    "Service Name",
    "Project Count",
    "Total Revenue",
    "Total Cost",
    "Total Profit",
    "Avg Revenue per Project",
    "Avg Cost per Project",
    "Avg Profit Margin (%)",
    "Avg Profit per Project",
    "Cumulative Percentage",
];

/// Render `records` as CSV: a header row, then one row per record.
///
/// Rows are joined by `\n` with no trailing newline. Numbers use their
/// shortest round-trip form (`1000`, `66.5`). Fields containing commas,
/// quotes or newlines are quoted. An empty slice yields an empty string.
///
/// # Errors
///
/// Returns [`ExportError`] if the CSV writer fails to flush.
pub fn export_to_csv(records: &[ServiceProfitabilityRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADERS)?;
    for r in records {
        wtr.write_record([
            r.service_name.clone().unwrap_or_default(),
            r.project_count.to_string(),
            r.total_revenue.to_string(),
            r.total_cost.to_string(),
            r.total_profit.to_string(),
            r.avg_revenue_per_project.to_string(),
            r.avg_cost_per_project.to_string(),
            r.avg_profit_margin_pct.to_string(),
            r.avg_profit_per_project.to_string(),
            r.cumulative_percentage.to_string(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    let mut out = String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))?;
    if out.ends_with('\n') {
        out.pop();
    }

    tracing::debug!(rows = records.len(), bytes = out.len(), "exported CSV");
    Ok(out)
}
