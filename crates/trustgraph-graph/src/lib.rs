//! GraphQL attestation source for trustgraph
//!
//! Translates [`AttestationFilters`](trustgraph_core::AttestationFilters)
//! into a single GraphQL request against the attestation indexer and
//! normalizes the heterogeneous `triples` records into
//! [`Attestation`](trustgraph_core::Attestation)s.
//!
//! ```rust,no_run
//! use trustgraph_core::{AttestationFilters, AttestationSource};
//! use trustgraph_graph::{GraphClient, GraphClientConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphClient::new(GraphClientConfig::new("http://localhost:8080/v1/graphql"))?;
//! let found = client.fetch(&AttestationFilters::new().limit(10)).await?;
//! println!("{} attestations", found.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod normalize;
pub mod query;

pub use client::GraphClient;
pub use config::{GraphClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use normalize::FieldPath;
