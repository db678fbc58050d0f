//! Scoring behaviour across generated attestation sets

use trustgraph_core::{
    compute_trust_score_at, find_trusted_experts, verify_credential, Attestation,
    AttestationBuilder,
};

const ADDR: &str = "0xabc0000000000000000000000000000000000001";
const NOW: i64 = 1_700_000_000;

const PREDICATES: &[&str] = &[
    "expert-in-defi",
    "scam-alert",
    "trusted-by",
    "untrusted",
    "reliable-validator",
    "skill:solidity",
    "credible-source",
    "likes",
    "verified-kyc",
    "fraud-report",
];

const OBJECTS: &[&str] = &["true", "warning", "solidity", "suspicious", "coffee", "expert"];

/// Deterministic pseudo-random attestation set (LCG), about `ADDR` or a neighbour.
fn generated(seed: u64, len: usize) -> Vec<Attestation> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    (0..len)
        .map(|i| {
            let subject = if next() % 3 == 0 { "0xdef" } else { ADDR };
            AttestationBuilder::new()
                .id(format!("0x{i:04x}"))
                .subject(subject)
                .predicate(PREDICATES[next() % PREDICATES.len()])
                .object(OBJECTS[next() % OBJECTS.len()])
                .timestamp(NOW - (len - i) as i64)
                .confidence((next() % 101) as f64 / 100.0)
                .build()
        })
        .collect()
}

#[test]
fn test_scores_stay_in_range() {
    for seed in 0..200 {
        let attestations = generated(seed, (seed as usize % 40) + 1);
        let score = compute_trust_score_at(&attestations, ADDR, NOW);

        for value in [
            score.score,
            score.breakdown.credibility,
            score.breakdown.expertise,
            score.breakdown.reliability,
            score.breakdown.reputation,
        ] {
            assert!((0.0..=100.0).contains(&value), "seed {seed}: {value} out of range");
        }
        assert_eq!(score.breakdown.reputation, score.score);
        assert!(
            score.positive_attestations + score.negative_attestations <= score.attestation_count,
            "seed {seed}: tally exceeds count"
        );
    }
}

#[test]
fn test_verification_confidence_is_exact_mean() {
    for seed in 0..100 {
        let attestations = generated(seed, 30);
        let result = verify_credential(&attestations, ADDR, "solidity");

        let expected: Vec<&Attestation> = attestations
            .iter()
            .filter(|a| a.involves(ADDR) && a.mentions("solidity"))
            .collect();

        assert_eq!(result.verified, !expected.is_empty());
        assert_eq!(result.attestations.len(), expected.len());
        if expected.is_empty() {
            assert_eq!(result.confidence, 0.0);
        } else {
            let mean = expected.iter().map(|a| a.confidence).sum::<f64>() / expected.len() as f64;
            assert_eq!(result.confidence, mean);
        }
    }
}

#[test]
fn test_expert_lists_respect_limit_and_order() {
    for seed in 0..100 {
        let attestations = generated(seed, 50);
        let limit = (seed as usize % 4) + 1;
        let experts = find_trusted_experts(&attestations, "expert", limit);

        assert!(experts.len() <= limit);
        for pair in experts.windows(2) {
            assert!(pair[0].attestation_count >= pair[1].attestation_count);
        }
        let mut addresses: Vec<&str> = experts.iter().map(|e| e.address.as_str()).collect();
        addresses.sort_unstable();
        addresses.dedup();
        assert_eq!(addresses.len(), experts.len());
    }
}
