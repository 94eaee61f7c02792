//! Error types for plotgrid-rpc.

use thiserror::Error;

/// Result type for plotgrid-rpc operations.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Errors from the ledger API, the wallet link, or configuration.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Malformed URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}
