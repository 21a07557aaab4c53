use thiserror::Error;

/// Errors returned by the analytics API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API endpoint configured. Raised before any request is made.
    #[error(
        "API endpoint not configured. Please set VOLTIQ_API_ENDPOINT in your environment or .env file"
    )]
    NotConfigured,

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The request never produced a response (DNS, refused connection,
    /// timeout, blocked by the browser-facing gateway's CORS policy).
    #[error(
        "Network error: unable to reach API at {url}. Check your API endpoint URL and CORS settings."
    )]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status. `body` holds at most the first 500 characters.
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered `"success": false`.
    #[error("API error: {0}")]
    Api(String),

    #[error("API returned unexpected data structure: {0}")]
    UnexpectedShape(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failure reading a response that did arrive.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
