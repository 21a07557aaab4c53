//! Interpretation of the `/descriptive` payload.
//!
//! ## Observed response shapes
//!
//! Behind API Gateway the Lambda result arrives wrapped, with the real payload
//! serialised as a string:
//!
//! ```json
//! { "statusCode": 200, "body": "{\"success\":true,...}" }
//! ```
//!
//! Invoked directly it arrives unwrapped. Either way the payload is:
//!
//! ```json
//! {
//!   "success": true,
//!   "timestamp": "2024-06-01T08:00:00Z",
//!   "record_count": 12,
//!   "data": {
//!     "service_profitability": { "results": [ ... ] },
//!     "material_cost_pareto":  { "results": [ ... ] },
//!     "project_clustering":    { "results": [ ... ] }
//!   }
//! }
//! ```
//!
//! The first API revision returned `data` as a flat array of service rows;
//! that form is still accepted.

use serde_json::{Map, Value};
use voltiq_core::{MaterialCostRecord, ServiceProfitabilityRecord};

use crate::error::ClientError;

const SERVICE_SECTION: &str = "service_profitability";
const MATERIAL_SECTION: &str = "material_cost_pareto";
const CLUSTERING_SECTION: &str = "project_clustering";

/// Decoded `/descriptive` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProfitability {
    pub success: bool,
    pub timestamp: Option<String>,
    /// `record_count` as reported, or the number of service rows when absent.
    pub record_count: usize,
    pub services: Vec<ServiceProfitabilityRecord>,
    /// Server-computed material Pareto; may be empty.
    pub materials: Vec<MaterialCostRecord>,
    /// Per-project rows for clustering; may be empty.
    pub projects: Vec<ServiceProfitabilityRecord>,
}

impl ServiceProfitability {
    /// A successful response that carried no data.
    #[must_use]
    pub fn empty(timestamp: Option<String>) -> Self {
        Self {
            success: true,
            timestamp,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.materials.is_empty() && self.projects.is_empty()
    }
}

/// Parse a `/descriptive` response body.
///
/// Unwraps one level of API-Gateway envelope, rejects `"success": false`,
/// and decodes the known sections. A missing or null `data`, or a `data`
/// object with none of the known sections, is a successful empty result.
///
/// # Errors
///
/// - [`ClientError::Deserialize`] if an envelope `body` is not JSON or a row
///   cannot be decoded.
/// - [`ClientError::Api`] when `success` is `false`.
/// - [`ClientError::UnexpectedShape`] when `data` or one of its sections has
///   the wrong type.
pub fn parse_descriptive_response(payload: Value) -> Result<ServiceProfitability, ClientError> {
    let unwrapped = match payload.get("body").and_then(Value::as_str) {
        Some(body) => {
            tracing::debug!("unwrapping API Gateway envelope");
            Some(
                serde_json::from_str::<Value>(body).map_err(|source| ClientError::Deserialize {
                    context: "API Gateway body".to_string(),
                    source,
                })?,
            )
        }
        None => None,
    };
    let mut payload = unwrapped.unwrap_or(payload);

    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        let message = payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("API returned unsuccessful response");
        return Err(ClientError::Api(message.to_string()));
    }

    let timestamp = payload.get("timestamp").and_then(scalar_string);
    let declared_count = payload
        .get("record_count")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok());

    let mut result = match payload.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => {
            tracing::warn!("no data returned from analytics API");
            return Ok(ServiceProfitability::empty(timestamp));
        }
        Some(Value::Array(rows)) => ServiceProfitability {
            services: decode_rows("data", rows)?,
            ..ServiceProfitability::empty(timestamp)
        },
        Some(Value::Object(mut sections)) => {
            let known = [SERVICE_SECTION, MATERIAL_SECTION, CLUSTERING_SECTION];
            if !known.iter().any(|s| sections.contains_key(*s)) {
                tracing::warn!("analytics API returned no known sections");
                return Ok(ServiceProfitability::empty(timestamp));
            }
            let services = section_results(&mut sections, SERVICE_SECTION)?.ok_or_else(|| {
                ClientError::UnexpectedShape(format!("missing {SERVICE_SECTION}.results"))
            })?;
            let materials = section_results(&mut sections, MATERIAL_SECTION)?.unwrap_or_default();
            let projects = section_results(&mut sections, CLUSTERING_SECTION)?.unwrap_or_default();
            ServiceProfitability {
                services: decode_rows(SERVICE_SECTION, services)?,
                materials: decode_rows(MATERIAL_SECTION, materials)?,
                projects: decode_rows(CLUSTERING_SECTION, projects)?,
                ..ServiceProfitability::empty(timestamp)
            }
        }
        Some(other) => {
            return Err(ClientError::UnexpectedShape(format!(
                "expected an object or array for `data`, got {}",
                json_type(&other)
            )));
        }
    };
    result.record_count = declared_count.unwrap_or(result.services.len());

    tracing::debug!(
        services = result.services.len(),
        materials = result.materials.len(),
        projects = result.projects.len(),
        "parsed descriptive analytics"
    );
    Ok(result)
}

/// Take `sections[name].results`.
///
/// Returns `Ok(None)` when the section is absent or null, and an
/// [`ClientError::UnexpectedShape`] when it is present without a results array.
fn section_results(
    sections: &mut Map<String, Value>,
    name: &str,
) -> Result<Option<Vec<Value>>, ClientError> {
    match sections.remove(name) {
        None | Some(Value::Null) => Ok(None),
        Some(mut section) => match section.get_mut("results").map(Value::take) {
            Some(Value::Array(rows)) => Ok(Some(rows)),
            Some(other) => Err(ClientError::UnexpectedShape(format!(
                "expected an array for {name}.results, got {}",
                json_type(&other)
            ))),
            None => Err(ClientError::UnexpectedShape(format!(
                "{name} has no results array"
            ))),
        },
    }
}

fn decode_rows<T>(context: &str, rows: Vec<Value>) -> Result<Vec<T>, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            serde_json::from_value(row).map_err(|source| ClientError::Deserialize {
                context: format!("{context}[{i}]"),
                source,
            })
        })
        .collect()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "response_test.rs"]
mod tests;
