//! Credential verification

use serde::{Deserialize, Serialize};

use crate::attestation::Attestation;

/// Answer to "does the graph back this claim about this address?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// True iff at least one attestation supports the claim
    pub verified: bool,
    /// Supporting attestations, in source order
    pub attestations: Vec<Attestation>,
    /// Mean confidence of the supporting attestations, 0 when there are none
    pub confidence: f64,
    /// Human-readable summary. Wording is not part of the contract.
    pub message: String,
}

/// Find attestations that both involve `address` (subject, creator, or object)
/// and mention `claim` (predicate or object). Both tests are case-insensitive
/// substring matches.
pub fn verify_credential(attestations: &[Attestation], address: &str, claim: &str) -> VerificationResult {
    let matches: Vec<Attestation> = attestations
        .iter()
        .filter(|a| a.involves(address) && a.mentions(claim))
        .cloned()
        .collect();

    let confidence = if matches.is_empty() {
        0.0
    } else {
        matches.iter().map(|a| a.confidence).sum::<f64>() / matches.len() as f64
    };

    let message = match matches.len() {
        0 => format!("No attestations found supporting claim '{claim}' for {address}"),
        1 => format!(
            "Found 1 attestation supporting claim '{claim}' for {address} (confidence {confidence:.2})"
        ),
        n => format!(
            "Found {n} attestations supporting claim '{claim}' for {address} (mean confidence {confidence:.2})"
        ),
    };

    VerificationResult {
        verified: !matches.is_empty(),
        attestations: matches,
        confidence,
        message,
    }
}
