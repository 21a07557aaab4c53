//! HTTP client for the analytics API.
//!
//! One endpoint, `GET {base}/descriptive`, returning every pre-aggregated
//! section the dashboard needs. Transport and status handling live here;
//! payload interpretation is in [`crate::parse_descriptive_response`].

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use voltiq_core::AppConfig;

use crate::error::ClientError;
use crate::response::{parse_descriptive_response, ServiceProfitability};
use crate::retry::retry_with_backoff;

pub const DEFAULT_USER_AGENT: &str = "voltiq/0.1 (service-analytics)";

/// Error bodies are cut to this many characters before being surfaced.
const ERROR_BODY_LIMIT: usize = 500;

/// Transport settings for [`AnalyticsClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after a transient failure. `0` disables retrying.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 0,
            retry_backoff_base_ms: 1_000,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Client for the analytics API.
///
/// Use [`AnalyticsClient::from_config`] in the binary or
/// [`AnalyticsClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: Client,
    base_url: String,
    options: ClientOptions,
}

impl AnalyticsClient {
    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConfigured`] when no endpoint is set; no
    /// network call is attempted. Otherwise see [`AnalyticsClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let endpoint = config
            .require_api_endpoint()
            .map_err(|_| ClientError::NotConfigured)?;
        Self::with_base_url(endpoint, &ClientOptions::from_config(config))
    }

    /// Builds a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConfigured`] for a blank URL,
    /// [`ClientError::InvalidBaseUrl`] if it does not parse, or
    /// [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(base_url: &str, options: &ClientOptions) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::NotConfigured);
        }
        Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
            options: options.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn descriptive_url(&self) -> String {
        format!("{}/descriptive", self.base_url)
    }

    /// Fetches and parses the descriptive analytics payload.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Network`] if the API cannot be reached.
    /// - [`ClientError::Status`] on a non-2xx status.
    /// - [`ClientError::Api`] when the API reports `"success": false`.
    /// - [`ClientError::UnexpectedShape`] or [`ClientError::Deserialize`] when
    ///   the payload does not match the expected structure.
    pub async fn get_service_profitability(&self) -> Result<ServiceProfitability, ClientError> {
        let url = self.descriptive_url();
        let body = retry_with_backoff(
            self.options.max_retries,
            self.options.retry_backoff_base_ms,
            || self.request_json(&url),
        )
        .await?;
        parse_descriptive_response(body)
    }

    /// Sends the GET, maps a non-2xx status to [`ClientError::Status`], and
    /// parses the body as JSON.
    async fn request_json(&self, url: &str) -> Result<serde_json::Value, ClientError> {
        tracing::debug!(url, "fetching descriptive analytics");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ClientError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "analytics API responded");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %text,
                "analytics API returned an error"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ClientError::Deserialize {
            context: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
