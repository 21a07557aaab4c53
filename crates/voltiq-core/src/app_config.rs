use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the analytics client and CLI.
///
/// The analytics endpoint and the BI embed URL are optional here so that
/// offline commands (forecasting, config inspection) still start without
/// them. Commands that need either value call [`AppConfig::require_api_endpoint`]
/// or [`AppConfig::require_bi_embed_url`] before doing any work.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_endpoint: Option<String>,
    pub bi_embed_url: Option<String>,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub cluster_count: usize,
}

impl AppConfig {
    /// Returns the analytics API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `VOLTIQ_API_ENDPOINT` was
    /// not set (or was blank).
    pub fn require_api_endpoint(&self) -> Result<&str, ConfigError> {
        self.api_endpoint
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("VOLTIQ_API_ENDPOINT".to_string()))
    }

    /// Returns the embedded BI dashboard URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `VOLTIQ_BI_EMBED_URL` was
    /// not set (or was blank).
    pub fn require_bi_embed_url(&self) -> Result<&str, ConfigError> {
        self.bi_embed_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("VOLTIQ_BI_EMBED_URL".to_string()))
    }

    /// Names of the environment variables the dashboard expects but did not get.
    #[must_use]
    pub fn missing_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_endpoint.is_none() {
            missing.push("VOLTIQ_API_ENDPOINT");
        }
        if self.bi_embed_url.is_none() {
            missing.push("VOLTIQ_BI_EMBED_URL");
        }
        missing
    }
}
