//! Error types for the xAI client.

use thiserror::Error;

/// Result type for xAI client operations.
pub type Result<T> = std::result::Result<T, XaiError>;

/// xAI client errors.
#[derive(Debug, Error)]
pub enum XaiError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, empty choices)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl XaiError {
    /// Whether a retry with the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, XaiError::Network(_))
    }
}
