//! Error types shared across the crate.

use canvas::codec::CodecError;

/// A configuration value is missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing configuration: {var} is not set")]
    Missing { var: &'static str },

    /// A variable is set but cannot be parsed.
    #[error("invalid {var} value '{value}': {reason}")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

/// A layout could not be fetched from or stored to the backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The target string is not `page:<id>` or `org-chart`.
    #[error("invalid layout target '{0}' (expected page:<id> or org-chart)")]
    InvalidTarget(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never got a response (connect failure, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The backend answered with something other than a JSON record.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The layout could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// The local layout cache could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cached layout is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
