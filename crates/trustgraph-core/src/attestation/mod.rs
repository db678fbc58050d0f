//! Attestation types - the core data model of trustgraph
//!
//! An attestation is a claim (subject, predicate, object) authored by a
//! creator address, with a timestamp and a confidence.
//!
//! # Example
//!
//! ```rust
//! use trustgraph_core::attestation::{Attestation, AttestationBuilder};
//!
//! let attestation = AttestationBuilder::new()
//!     .id("0x01")
//!     .creator("0x1111111111111111111111111111111111111111")
//!     .subject("0x2222222222222222222222222222222222222222")
//!     .predicate("expert-in")
//!     .object("solidity")
//!     .build();
//!
//! assert_eq!(attestation.predicate, "expert-in");
//! ```

mod types;

pub use types::{
    contains_ignore_case, Attestation, AttestationBuilder, AttestationFilters, DEFAULT_CONFIDENCE,
    DEFAULT_LIMIT, MAX_LIMIT,
};
