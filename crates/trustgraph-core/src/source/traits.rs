//! Source trait definitions

use std::future::Future;

use crate::attestation::{Attestation, AttestationFilters};
use crate::source::error::SourceResult;

/// Retrieval of attestations matching a filter.
///
/// One call corresponds to at most one upstream round trip. Implementations
/// must return either the complete page or an error, never a partial page.
/// Dropping the returned future abandons the retrieval.
pub trait AttestationSource: Send + Sync {
    /// Fetch attestations matching `filters`, honoring its limit and offset.
    fn fetch(
        &self,
        filters: &AttestationFilters,
    ) -> impl Future<Output = SourceResult<Vec<Attestation>>> + Send;

    /// Short label for logs and health output.
    fn describe(&self) -> String {
        "attestation source".to_string()
    }
}
