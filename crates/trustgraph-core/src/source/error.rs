//! Retrieval error types

use thiserror::Error;

/// Errors that can occur while retrieving attestations.
///
/// Every variant carries the upstream message. Retrieval is never retried
/// automatically and never yields partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    /// Connection, DNS, TLS, or body read failure
    #[error("graph transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout
    #[error("graph request timed out after {0}s")]
    Timeout(u64),

    /// The service answered with a non-2xx status
    #[error("graph service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The service reported query errors
    #[error("graph query failed: {0}")]
    Upstream(String),

    /// The response did not have the expected shape
    #[error("unexpected graph response: {0}")]
    Schema(String),
}

/// Result type for retrieval operations
pub type SourceResult<T> = Result<T, RetrievalError>;
