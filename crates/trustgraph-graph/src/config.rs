//! Graph client configuration

use std::time::Duration;

use trustgraph_core::DEFAULT_CONFIDENCE;

/// Endpoint used when none is configured (a local Hasura-style indexer).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/graphql";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`GraphClient`](crate::GraphClient).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphClientConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Whole-request timeout, connect through body read
    pub timeout: Duration,
    /// Confidence stamped on every normalized attestation
    pub default_confidence: f64,
}

impl GraphClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_confidence(mut self, confidence: f64) -> Self {
        self.default_confidence = confidence;
        self
    }
}

impl Default for GraphClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }
}
