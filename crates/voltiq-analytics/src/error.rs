use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClusterError {
    #[error("cluster count must be at least 1")]
    ZeroClusters,

    #[error("iteration cap must be at least 1")]
    ZeroIterations,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("invalid {field}: {value} (must be a finite, non-negative number)")]
    InvalidInput { field: &'static str, value: f64 },
}
