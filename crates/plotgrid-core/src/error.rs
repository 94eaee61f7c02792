//! Error types for plotgrid-core.

use thiserror::Error;

/// Result type for plotgrid-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole operation.
///
/// Problems with a single record never surface here; they become a
/// [`SkipReason`](crate::SkipReason) and the pass continues.
#[derive(Debug, Error)]
pub enum Error {
    /// The data source could not list references at all.
    #[error("Data source error: {0}")]
    Source(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
