//! Aggregate trust score per address

use serde::{Deserialize, Serialize};

use super::policy::{Polarity, ScoringPolicy};
use crate::attestation::{contains_ignore_case, Attestation};

/// Facet scores, each in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub credibility: f64,
    pub expertise: f64,
    pub reliability: f64,
    /// Always equal to the overall score
    pub reputation: f64,
}

/// Trust score derived for one address from its relevant attestations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    pub address: String,
    pub score: f64,
    pub attestation_count: usize,
    pub positive_attestations: usize,
    pub negative_attestations: usize,
    /// Unix seconds at which the score was computed
    pub last_updated: i64,
    pub breakdown: ScoreBreakdown,
}

impl TrustScore {
    /// Score for an address with no relevant attestations.
    pub fn zero(address: impl Into<String>, now: i64) -> Self {
        Self {
            address: address.into(),
            score: 0.0,
            attestation_count: 0,
            positive_attestations: 0,
            negative_attestations: 0,
            last_updated: now,
            breakdown: ScoreBreakdown::default(),
        }
    }
}

/// Sentiment tally over a set of attestations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    total: usize,
    positive: usize,
    negative: usize,
}

impl Tally {
    fn over<'a>(attestations: impl IntoIterator<Item = &'a Attestation>, policy: &ScoringPolicy) -> Self {
        let mut tally = Self::default();
        for attestation in attestations {
            tally.total += 1;
            match policy.lexicon.classify(&attestation.claim_text()) {
                Some(Polarity::Positive) => tally.positive += 1,
                Some(Polarity::Negative) => tally.negative += 1,
                None => {}
            }
        }
        tally
    }

    /// `((pos - w*neg) / total) * 100 + baseline`, clamped; 0 for an empty tally.
    fn score(&self, policy: &ScoringPolicy) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let net = self.positive as f64 - policy.negative_weight * self.negative as f64;
        clamp_score(net / self.total as f64 * 100.0 + policy.baseline)
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn predicate_has_any(attestation: &Attestation, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| contains_ignore_case(&attestation.predicate, k))
}

/// Compute the trust score of `address` under `policy`, stamped with `now`.
///
/// Relevance is a case-insensitive substring match of the address against
/// subject, creator, or object. An address that is a substring of another
/// address therefore also matches that address's attestations; upstream
/// labels embed truncated addresses, so recall is preferred here.
pub fn score_with_policy(
    attestations: &[Attestation],
    address: &str,
    policy: &ScoringPolicy,
    now: i64,
) -> TrustScore {
    let relevant: Vec<&Attestation> = attestations.iter().filter(|a| a.involves(address)).collect();
    if relevant.is_empty() {
        return TrustScore::zero(address, now);
    }

    let overall = Tally::over(relevant.iter().copied(), policy);
    let score = overall.score(policy);

    let facet = |keywords: &[String]| {
        Tally::over(
            relevant
                .iter()
                .copied()
                .filter(|a| predicate_has_any(a, keywords)),
            policy,
        )
        .score(policy)
    };

    TrustScore {
        address: address.to_string(),
        score,
        attestation_count: overall.total,
        positive_attestations: overall.positive,
        negative_attestations: overall.negative,
        last_updated: now,
        breakdown: ScoreBreakdown {
            credibility: facet(&policy.categories.credibility),
            expertise: facet(&policy.categories.expertise),
            reliability: facet(&policy.categories.reliability),
            reputation: score,
        },
    }
}

/// Compute the trust score of `address` with the default policy at `now`.
pub fn compute_trust_score_at(attestations: &[Attestation], address: &str, now: i64) -> TrustScore {
    score_with_policy(attestations, address, &ScoringPolicy::default(), now)
}

/// Compute the trust score of `address` with the default policy, stamped with the wall clock.
pub fn compute_trust_score(attestations: &[Attestation], address: &str) -> TrustScore {
    compute_trust_score_at(attestations, address, chrono::Utc::now().timestamp())
}
