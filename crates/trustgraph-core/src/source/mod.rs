//! Retrieval abstraction for attestations
//!
//! This module defines the [`AttestationSource`] trait that abstracts over
//! where attestations come from. Implementations exist for:
//!
//! - **Graph**: the GraphQL attestation indexer (`trustgraph-graph` crate)
//! - **Static**: a fixed in-memory set, for tests and offline fixtures
//!   ([`StaticSource`])
//!
//! Sources are constructed explicitly and handed to whoever needs them;
//! there is no process-wide client.
//!
//! # Example
//!
//! ```rust
//! use trustgraph_core::attestation::{AttestationBuilder, AttestationFilters};
//! use trustgraph_core::source::{AttestationSource, StaticSource};
//!
//! # async fn demo() {
//! let source = StaticSource::new(vec![AttestationBuilder::new()
//!     .id("0x01")
//!     .subject("0xabc")
//!     .predicate("knows")
//!     .object("rust")
//!     .build()]);
//!
//! let found = source.fetch(&AttestationFilters::new()).await.unwrap();
//! assert_eq!(found.len(), 1);
//! # }
//! ```

mod error;
mod memory;
mod traits;

pub use error::{RetrievalError, SourceResult};
pub use memory::StaticSource;
pub use traits::AttestationSource;
