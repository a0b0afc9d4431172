//! Error types for connectors

use thiserror::Error;

/// Errors that can occur during adapter and scheduler operations
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Failed to initialize adapter (e.g., HTTP client creation failed)
    #[error("failed to initialize adapter: {0}")]
    Init(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// API rate limited
    #[error("rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// The source has no equivalent of the requested operation
    #[error("{source_name} does not support {operation}")]
    Unsupported {
        source_name: &'static str,
        operation: &'static str,
    },

    /// Unknown source type in configuration
    #[error("unknown source type: {0}")]
    UnknownSourceType(String),

    /// Schedule parsing error
    #[error("invalid cron schedule: {0}")]
    InvalidSchedule(String),
}

impl ConnectorError {
    /// Create an Unsupported error
    pub fn unsupported(source_name: &'static str, operation: &'static str) -> Self {
        Self::Unsupported {
            source_name,
            operation,
        }
    }

    /// True when the error marks a missing capability rather than a failure
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}
