//! trustgraph Core Engine
//!
//! The computational kernel behind trustgraph: the attestation data model,
//! the [`AttestationSource`] seam that retrieval backends implement, and the
//! pure scoring functions that turn attestations into trust signals.
//!
//! Nothing in this crate performs I/O. Network retrieval lives in
//! `trustgraph-graph`; this crate only defines the trait it implements.
//!
//! # Example
//!
//! ```rust
//! use trustgraph_core::attestation::AttestationBuilder;
//! use trustgraph_core::score::compute_trust_score;
//!
//! let address = "0xabc0000000000000000000000000000000000001";
//! let attestations = vec![AttestationBuilder::new()
//!     .id("t-1")
//!     .subject(address)
//!     .predicate("is trusted by")
//!     .object("dao")
//!     .build()];
//!
//! let score = compute_trust_score(&attestations, address);
//! assert_eq!(score.positive_attestations, 1);
//! assert_eq!(score.score, 100.0);
//! ```

pub mod attestation;
pub mod score;
pub mod source;

// Re-export main types at crate root
pub use attestation::{
    contains_ignore_case, Attestation, AttestationBuilder, AttestationFilters, DEFAULT_CONFIDENCE,
    DEFAULT_LIMIT, MAX_LIMIT,
};
pub use score::{
    compute_trust_score, compute_trust_score_at, expert_trust_score, find_trusted_experts,
    verify_credential, CategoryKeywords, Expert, Polarity, ScoreBreakdown, ScoringEngine,
    ScoringPolicy, SentimentLexicon, TrustScore, VerificationResult,
};
pub use source::{AttestationSource, RetrievalError, SourceResult, StaticSource};
