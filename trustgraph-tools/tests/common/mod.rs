//! Shared fixtures for tool service tests

#![allow(dead_code)]

use std::sync::Arc;

use trustgraph_core::{Attestation, AttestationBuilder, StaticSource};
use trustgraph_tools::ToolRegistry;

pub const ALICE: &str = "0xa11ce00000000000000000000000000000000001";
pub const BOB: &str = "0xb0b0000000000000000000000000000000000002";
pub const CAROL: &str = "0xca20100000000000000000000000000000000003";

fn claim(id: &str, creator: &str, subject: &str, predicate: &str, object: &str, timestamp: i64, confidence: f64) -> Attestation {
    AttestationBuilder::new()
        .id(id)
        .creator(creator)
        .subject(subject)
        .predicate(predicate)
        .object(object)
        .timestamp(timestamp)
        .confidence(confidence)
        .build()
}

/// A small graph: Alice has one expert and one scam attestation, Bob is a
/// Solidity expert three times over, Carol once.
pub fn graph() -> Vec<Attestation> {
    vec![
        claim("0x01", BOB, ALICE, "expert-in-defi", "true", 100, 0.9),
        claim("0x02", CAROL, ALICE, "scam-alert", "warning", 200, 0.1),
        claim("0x03", ALICE, BOB, "expert-in", "solidity", 300, 0.85),
        claim("0x04", CAROL, BOB, "audits", "solidity contracts", 400, 0.85),
        claim("0x05", ALICE, CAROL, "writes", "solidity", 500, 0.85),
        claim("0x06", CAROL, BOB, "solidity-certified", "true", 600, 0.7),
        claim("0x07", BOB, CAROL, "likes", "coffee", 700, 0.85),
    ]
}

pub fn registry() -> Arc<ToolRegistry<StaticSource>> {
    Arc::new(ToolRegistry::new(StaticSource::new(graph())))
}
