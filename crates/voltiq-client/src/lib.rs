//! HTTP client for the analytics API's `/descriptive` endpoint.
//!
//! [`AnalyticsClient`] performs the request; [`parse_descriptive_response`]
//! turns the (possibly API-Gateway-wrapped) JSON into typed records and can be
//! used on its own against a saved payload.

mod client;
pub mod error;
mod response;
mod retry;

pub use client::{AnalyticsClient, ClientOptions, DEFAULT_USER_AGENT};
pub use error::ClientError;
pub use response::{parse_descriptive_response, ServiceProfitability};
