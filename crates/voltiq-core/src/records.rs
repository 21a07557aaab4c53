//! Analytics API record types.
//!
//! ## Observed shape of `/descriptive` results
//!
//! Rows come from Athena queries serialised by a Lambda, so numeric columns
//! arrive as JSON numbers, numeric strings (`"1250.50"`), or `null` when the
//! aggregate had no input rows. Any column may be omitted entirely.
//!
//! Every numeric field therefore decodes through [`lenient_f64`]: numbers pass
//! through, numeric strings are parsed (thousands separators stripped), and
//! everything else, including non-finite values, becomes `0.0`. Identifier
//! columns may be numeric or textual and are normalised to `String`.
//!
//! Decoding happens once at the API boundary, so the analytics functions can
//! work with plain `f64` fields and never re-check for missing values.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row per service type (service profitability) or per project
/// (project clustering).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceProfitabilityRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub project_count: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_profit: f64,
    /// Per-project rows name this column `profit_margin_pct`.
    #[serde(default, alias = "profit_margin_pct", deserialize_with = "lenient_f64")]
    pub avg_profit_margin_pct: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_revenue_per_project: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_cost_per_project: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_profit_per_project: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cumulative_percentage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub days_to_completion: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub payment_recovery_days: f64,
}

impl ServiceProfitabilityRecord {
    /// Service name for display, `"Unknown"` when absent.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or("Unknown")
    }

    /// Best available project label: name, then id, then `"Project"`.
    #[must_use]
    pub fn project_label(&self) -> &str {
        self.project_name
            .as_deref()
            .or(self.project_id.as_deref())
            .unwrap_or("Project")
    }
}

/// One row of the server-computed material cost Pareto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCostRecord {
    #[serde(
        default = "default_category",
        alias = "material_category",
        alias = "material_type",
        alias = "service_name",
        deserialize_with = "category_or_other"
    )]
    pub category: String,
    #[serde(
        default,
        alias = "material_cost",
        alias = "total_material_cost",
        alias = "cost",
        deserialize_with = "lenient_f64"
    )]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cumulative_percentage: f64,
}

fn default_category() -> String {
    "Other".to_string()
}

/// Decode any JSON value into an `f64`, substituting `0.0` for anything that
/// is not a finite number or a numeric string.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce a JSON value at all.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0.0, value_to_f64))
}

/// Convert a JSON value to `f64` with the same leniency as [`lenient_f64`].
#[must_use]
pub fn value_to_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn category_or_other<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_else(default_category))
}
