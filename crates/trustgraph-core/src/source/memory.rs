//! In-memory attestation source
//!
//! A fixed, ordered set of attestations. Used as the test double for the
//! graph client and as the backend for offline fixture files.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::attestation::{Attestation, AttestationFilters};
use crate::source::error::{RetrievalError, SourceResult};
use crate::source::traits::AttestationSource;

/// In-memory attestation source.
///
/// Applies [`AttestationFilters`] the same way the graph service would,
/// preserving insertion order. Can also be configured to fail every fetch.
#[derive(Debug, Default)]
pub struct StaticSource {
    attestations: Vec<Attestation>,
    failure: Option<RetrievalError>,
    fetches: AtomicUsize,
}

impl StaticSource {
    /// Create a source serving the given attestations in order.
    pub fn new(attestations: Vec<Attestation>) -> Self {
        Self {
            attestations,
            failure: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Create a source whose every fetch fails with `error`.
    pub fn failing(error: RetrievalError) -> Self {
        Self {
            attestations: Vec::new(),
            failure: Some(error),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Parse a JSON array of attestations (the same shape the API emits).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let attestations: Vec<Attestation> = serde_json::from_str(json)?;
        Ok(Self::new(attestations))
    }

    /// Number of attestations held.
    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }

    /// Number of fetches served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn query(&self, filters: &AttestationFilters) -> Vec<Attestation> {
        self.attestations
            .iter()
            .filter(|a| filters.matches(a))
            .skip(filters.effective_offset())
            .take(filters.effective_limit())
            .cloned()
            .collect()
    }
}

impl AttestationSource for StaticSource {
    async fn fetch(&self, filters: &AttestationFilters) -> SourceResult<Vec<Attestation>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.query(filters))
    }

    fn describe(&self) -> String {
        format!("static source ({} attestations)", self.attestations.len())
    }
}
