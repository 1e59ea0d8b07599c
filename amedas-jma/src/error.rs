/// Error types for the AMeDAS pipeline
use thiserror::Error;

/// Main error type for snapshot loading and metric lookup
#[derive(Error, Debug)]
pub enum AmedasError {
    /// A metric identifier that the catalog does not register
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Upstream payload did not have a recognizable shape
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The upstream fetcher could not retrieve a payload
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// A catalog definition violates the bucket ordering rules
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl From<serde_json::Error> for AmedasError {
    fn from(err: serde_json::Error) -> Self {
        AmedasError::MalformedSnapshot(err.to_string())
    }
}

/// Type alias for Results using AmedasError
pub type Result<T> = std::result::Result<T, AmedasError>;
