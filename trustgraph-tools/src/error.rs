//! Tool execution errors

use serde_json::{json, Value};
use thiserror::Error;

use trustgraph_core::RetrievalError;

use crate::validate::ValidationError;

/// Message reported for failures that are not the caller's or the graph's fault.
pub const INTERNAL_MESSAGE: &str = "internal error while executing tool";

/// Everything a tool invocation can fail with.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Parameters did not satisfy the operation's schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation name is not in the registry
    #[error("unknown tool '{name}'")]
    UnknownOperation {
        name: String,
        valid: Vec<&'static str>,
    },

    /// The attestation source failed
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Anything else; the detail is for logs only
    #[error("internal error while executing tool")]
    Internal(String),
}

impl ToolError {
    /// HTTP status for the one-shot entry point.
    pub fn status_code(&self) -> u16 {
        match self {
            ToolError::Validation(_) | ToolError::UnknownOperation { .. } => 400,
            ToolError::Retrieval(_) | ToolError::Internal(_) => 500,
        }
    }

    /// JSON-RPC error code for the agent session.
    pub fn rpc_code(&self) -> i64 {
        match self {
            ToolError::UnknownOperation { .. } => -32601,
            ToolError::Validation(_) => -32602,
            ToolError::Retrieval(_) => -32000,
            ToolError::Internal(_) => -32603,
        }
    }

    /// Structured detail safe to show the caller.
    pub fn details(&self) -> Option<Value> {
        match self {
            ToolError::Validation(err) => Some(json!({ "violations": err.violations })),
            ToolError::UnknownOperation { valid, .. } => Some(json!({ "validTools": valid })),
            ToolError::Retrieval(_) | ToolError::Internal(_) => None,
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::Internal(format!("serialization error: {err}"))
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::FieldViolation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_detail_is_not_displayed() {
        let err = ToolError::Internal("secret stack".into());
        assert_eq!(err.to_string(), INTERNAL_MESSAGE);
        assert_eq!(err.details(), None);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_codes() {
        let validation = ToolError::from(ValidationError {
            violations: vec![FieldViolation::new("limit", "must be between 1 and 1000")],
        });
        assert_eq!(validation.status_code(), 400);
        assert_eq!(validation.rpc_code(), -32602);
        assert_eq!(
            validation.details().unwrap()["violations"][0]["field"],
            "limit"
        );

        let unknown = ToolError::UnknownOperation {
            name: "x".into(),
            valid: vec!["getTrustScore"],
        };
        assert_eq!(unknown.status_code(), 400);
        assert_eq!(unknown.rpc_code(), -32601);

        let retrieval = ToolError::from(RetrievalError::Timeout(30));
        assert_eq!(retrieval.status_code(), 500);
        assert_eq!(retrieval.rpc_code(), -32000);
        assert!(retrieval.to_string().contains("timed out"));
    }
}
