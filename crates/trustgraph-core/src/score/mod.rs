//! Trust Scoring
//!
//! Pure, deterministic functions turning attestations into trust signals:
//!
//! - **Trust score**: sentiment-weighted aggregate per address, with
//!   credibility / expertise / reliability facets
//! - **Credential verification**: does any attestation back a claim?
//! - **Expert ranking**: subjects ranked by topic attestation count
//!
//! Trust scores and expert scores come from two separate formulas
//! ([`compute_trust_score`] and [`expert_trust_score`]). They are not
//! expected to agree for the same address.
//!
//! # Sentiment formula
//!
//! ```text
//! score = clamp(((positive - 2 * negative) / total) * 100 + 50, 0, 100)
//! ```
//!
//! The keyword lexicon, negative weight, and baseline come from a
//! [`ScoringPolicy`]; the defaults reproduce the formula above.

mod credential;
mod experts;
mod policy;
mod trust;

pub use credential::{verify_credential, VerificationResult};
pub use experts::{expert_trust_score, find_trusted_experts, Expert};
pub use policy::{CategoryKeywords, Polarity, ScoringPolicy, SentimentLexicon};
pub use trust::{compute_trust_score, compute_trust_score_at, score_with_policy, ScoreBreakdown, TrustScore};

use crate::attestation::Attestation;

/// Scoring functions bound to one policy.
///
/// Credential verification and expert ranking do not depend on the policy;
/// they are exposed here so callers can hold a single engine value.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Trust score stamped with the wall clock.
    pub fn trust_score(&self, attestations: &[Attestation], address: &str) -> TrustScore {
        self.trust_score_at(attestations, address, chrono::Utc::now().timestamp())
    }

    pub fn trust_score_at(&self, attestations: &[Attestation], address: &str, now: i64) -> TrustScore {
        score_with_policy(attestations, address, &self.policy, now)
    }

    pub fn verify_credential(
        &self,
        attestations: &[Attestation],
        address: &str,
        claim: &str,
    ) -> VerificationResult {
        verify_credential(attestations, address, claim)
    }

    pub fn find_trusted_experts(
        &self,
        attestations: &[Attestation],
        topic: &str,
        limit: usize,
    ) -> Vec<Expert> {
        find_trusted_experts(attestations, topic, limit)
    }
}
