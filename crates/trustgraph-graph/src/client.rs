//! GraphQL attestation client

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, warn};

use trustgraph::tracing::prefix;
use trustgraph_core::{Attestation, AttestationFilters, AttestationSource, RetrievalError, SourceResult};

use crate::config::GraphClientConfig;
use crate::{normalize, query};

/// Longest upstream body excerpt carried in a status error.
const MAX_ERROR_BODY: usize = 512;

/// Attestation source backed by the GraphQL indexer.
///
/// Each [`fetch`](AttestationSource::fetch) is exactly one POST. There is no
/// retry and no cache. Dropping the future aborts the request.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    config: GraphClientConfig,
}

impl GraphClient {
    pub fn new(config: GraphClientConfig) -> trustgraph::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| trustgraph::Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GraphClientConfig {
        &self.config
    }

    fn transport_error(&self, err: reqwest::Error) -> RetrievalError {
        if err.is_timeout() {
            RetrievalError::Timeout(self.config.timeout.as_secs())
        } else {
            RetrievalError::Transport(err.to_string())
        }
    }

    async fn post(&self, body: &Value) -> SourceResult<Value> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let mut message = text.trim().to_string();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| message.is_char_boundary(i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| RetrievalError::Schema(format!("response is not valid JSON: {e}")))
    }
}

impl AttestationSource for GraphClient {
    async fn fetch(&self, filters: &AttestationFilters) -> SourceResult<Vec<Attestation>> {
        let started = Instant::now();
        let body = query::request_body(filters);

        let outcome = async {
            let response = self.post(&body).await?;
            let records = normalize::extract_triples(&response)?;
            normalize::normalize_triples(records, self.config.default_confidence)
        }
        .await;

        let mut attestations = match outcome {
            Ok(attestations) => attestations,
            Err(err) => {
                warn!(
                    "{} graph fetch failed after {:?}: {}",
                    prefix::GRAPH,
                    started.elapsed(),
                    err
                );
                return Err(err);
            }
        };

        // The server clause is a superset of the normalized match, and
        // confidence is assigned locally
        attestations.retain(|a| filters.matches(a));

        debug!(
            "{} fetched {} attestations in {:?}",
            prefix::GRAPH,
            attestations.len(),
            started.elapsed()
        );
        Ok(attestations)
    }

    fn describe(&self) -> String {
        format!("graph {}", self.config.endpoint)
    }
}
