//! Common error types for trustgraph Rust components.

use thiserror::Error;

/// Common error type for process-level trustgraph operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server error (bind, serve)
    #[error("server error: {0}")]
    Server(String),
}

/// Result type alias using trustgraph Error.
pub type Result<T> = std::result::Result<T, Error>;
