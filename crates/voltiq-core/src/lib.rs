mod app_config;
mod config;
pub mod format;
pub mod records;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::{format_currency, format_number, format_percentage};
pub use records::{MaterialCostRecord, ServiceProfitabilityRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
