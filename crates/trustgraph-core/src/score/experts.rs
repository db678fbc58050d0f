//! Expert ranking per topic

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attestation::Attestation;

/// A subject ranked as knowledgeable about a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expert {
    /// The subject the matching attestations are about
    pub address: String,
    pub trust_score: f64,
    /// Number of topic-matching attestations about this subject
    pub attestation_count: usize,
    /// Distinct predicates of the matching attestations, first-seen order
    pub specializations: Vec<String>,
    /// Latest timestamp among the matching attestations
    pub recent_activity: i64,
}

/// Saturating linear score for an expert with `match_count` topic attestations.
///
/// Deliberately independent of [`compute_trust_score`](super::compute_trust_score):
/// the two numbers are not expected to agree for the same address.
pub fn expert_trust_score(match_count: usize) -> f64 {
    (50.0 + 10.0 * match_count as f64).min(100.0)
}

/// Rank subjects by how many attestations tie them to `topic`.
///
/// An attestation matches when its predicate or object contains `topic`
/// (case-insensitive). Matches are grouped by exact subject. Ordering is by
/// descending match count; ties keep the order in which subjects were first
/// seen in `attestations`. At most `limit` experts are returned.
pub fn find_trusted_experts(attestations: &[Attestation], topic: &str, limit: usize) -> Vec<Expert> {
    // first-seen order in `experts`, lookup by subject in `index`
    let mut experts: Vec<Expert> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for attestation in attestations.iter().filter(|a| a.mentions(topic)) {
        let slot = *index.entry(attestation.subject.as_str()).or_insert_with(|| {
            experts.push(Expert {
                address: attestation.subject.clone(),
                trust_score: 0.0,
                attestation_count: 0,
                specializations: Vec::new(),
                recent_activity: attestation.timestamp,
            });
            experts.len() - 1
        });
        let expert = &mut experts[slot];

        expert.attestation_count += 1;
        expert.recent_activity = expert.recent_activity.max(attestation.timestamp);
        if !expert.specializations.contains(&attestation.predicate) {
            expert.specializations.push(attestation.predicate.clone());
        }
    }

    for expert in &mut experts {
        expert.trust_score = expert_trust_score(expert.attestation_count);
    }

    // sort_by is stable: equal counts keep first-seen order
    experts.sort_by(|a, b| b.attestation_count.cmp(&a.attestation_count));
    experts.truncate(limit);
    experts
}
