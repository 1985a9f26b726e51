//! Typed errors for the outfit finder.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Note that almost nothing in the search path surfaces as an error: model
//! failures are counted as failed attempts and unreachable links are dropped.
//! These variants exist for the few places a caller genuinely has to react.

use thiserror::Error;

/// Errors that can occur while finding outfit links.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The user sent nothing searchable
    #[error("empty style query")]
    EmptyQuery,

    /// Model call failed (network, non-2xx, malformed body)
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// Catalog file could not be read
    #[error("catalog I/O error: {0}")]
    CatalogIo(#[from] std::io::Error),

    /// Catalog file is not the expected JSON shape
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// Invalid settings or a client that could not be built
    #[error("config error: {0}")]
    Config(String),

    /// A product-pattern regex failed to compile
    #[error("invalid product pattern for {domain}: {source}")]
    Pattern {
        domain: String,
        #[source]
        source: regex::Error,
    },
}

impl FinderError {
    /// Wrap any error coming out of a model implementation.
    pub fn model(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        FinderError::Model(Box::new(err))
    }
}

/// Result type alias for finder operations.
pub type Result<T> = std::result::Result<T, FinderError>;
