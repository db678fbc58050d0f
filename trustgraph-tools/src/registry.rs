//! Tool registry and dispatch
//!
//! The four operations are fixed at compile time. Each dispatch validates
//! its parameters, fetches once from the injected source, and scores in
//! memory. The same registry serves the HTTP entry point and the stdio
//! session.

use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use trustgraph::tracing::prefix;
use trustgraph_core::{
    Attestation, AttestationFilters, AttestationSource, ScoringEngine, ScoringPolicy, MAX_LIMIT,
};

use crate::error::{ToolError, ToolResult};
use crate::validate::{self, CredentialParams, ExpertParams, TrustScoreParams};

/// The operations a caller can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetTrustScore,
    GetAttestations,
    VerifyCredential,
    FindTrustedExperts,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::GetTrustScore,
        Operation::GetAttestations,
        Operation::VerifyCredential,
        Operation::FindTrustedExperts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::GetTrustScore => "getTrustScore",
            Operation::GetAttestations => "getAttestations",
            Operation::VerifyCredential => "verifyCredential",
            Operation::FindTrustedExperts => "findTrustedExperts",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn spec(self) -> ToolSpec {
        let address = json!({
            "type": "string",
            "pattern": "^0x[0-9a-fA-F]{40}$",
            "description": "Account address"
        });
        match self {
            Operation::GetTrustScore => ToolSpec {
                name: self.name(),
                description: "Aggregate trust score for an address, with credibility, expertise, and reliability breakdown",
                input_schema: json!({
                    "type": "object",
                    "properties": { "address": address },
                    "required": ["address"]
                }),
                example: json!({ "address": "0x1234567890abcdef1234567890abcdef12345678" }),
            },
            Operation::GetAttestations => ToolSpec {
                name: self.name(),
                description: "List attestations matching optional filters",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "creator": { "type": "string" },
                        "subject": { "type": "string" },
                        "predicate": { "type": "string" },
                        "object": { "type": "string" },
                        "minConfidence": { "type": "number", "minimum": 0, "maximum": 1 },
                        "fromTimestamp": { "type": "integer", "minimum": 0 },
                        "toTimestamp": { "type": "integer", "minimum": 0 },
                        "limit": { "type": "integer", "minimum": 1, "maximum": MAX_LIMIT, "default": 100 },
                        "offset": { "type": "integer", "minimum": 0, "default": 0 }
                    }
                }),
                example: json!({ "predicate": "expert-in", "limit": 20 }),
            },
            Operation::VerifyCredential => ToolSpec {
                name: self.name(),
                description: "Check whether any attestation about an address supports a claim",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "address": address,
                        "claim": { "type": "string", "minLength": 1 }
                    },
                    "required": ["address", "claim"]
                }),
                example: json!({
                    "address": "0x1234567890abcdef1234567890abcdef12345678",
                    "claim": "solidity-certified"
                }),
            },
            Operation::FindTrustedExperts => ToolSpec {
                name: self.name(),
                description: "Rank subjects by the number of attestations tying them to a topic",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "topic": { "type": "string", "minLength": 1 },
                        "limit": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": validate::MAX_EXPERT_LIMIT,
                            "default": validate::DEFAULT_EXPERT_LIMIT
                        }
                    },
                    "required": ["topic"]
                }),
                example: json!({ "topic": "defi", "limit": 5 }),
            },
        }
    }
}

/// Static description of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub example: Value,
}

/// Names of every registered tool, in listing order.
pub fn tool_names() -> Vec<&'static str> {
    Operation::ALL.iter().map(|op| op.name()).collect()
}

/// Specs of every registered tool, in listing order.
pub fn tool_specs() -> Vec<ToolSpec> {
    Operation::ALL.iter().map(|op| op.spec()).collect()
}

/// Dispatches tool invocations against one attestation source.
#[derive(Debug)]
pub struct ToolRegistry<S> {
    source: S,
    engine: ScoringEngine,
}

impl<S: AttestationSource> ToolRegistry<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, ScoringPolicy::default())
    }

    pub fn with_policy(source: S, policy: ScoringPolicy) -> Self {
        Self {
            source,
            engine: ScoringEngine::new(policy),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Invoke `name` with `params`, returning the operation's JSON result.
    pub async fn dispatch(&self, name: &str, params: &Value) -> ToolResult<Value> {
        let started = Instant::now();

        let Some(op) = Operation::from_name(name) else {
            warn!("{} unknown tool '{}'", prefix::DISPATCH, name);
            return Err(ToolError::UnknownOperation {
                name: name.to_string(),
                valid: tool_names(),
            });
        };

        let result = self.execute(op, params).await;

        match &result {
            Ok(_) => info!("{} {} ok in {:?}", prefix::DISPATCH, name, started.elapsed()),
            Err(ToolError::Internal(detail)) => warn!(
                "{} {} failed in {:?}: {}",
                prefix::DISPATCH,
                name,
                started.elapsed(),
                detail
            ),
            Err(err) => warn!(
                "{} {} failed in {:?}: {}",
                prefix::DISPATCH,
                name,
                started.elapsed(),
                err
            ),
        }
        result
    }

    /// `getAttestations`, also returning the validated filters for echoing.
    pub async fn query_attestations(
        &self,
        params: &Value,
    ) -> ToolResult<(AttestationFilters, Vec<Attestation>)> {
        let filters = validate::attestation_filters(params)?;
        let attestations = self.source.fetch(&filters).await?;
        Ok((filters, attestations))
    }

    async fn execute(&self, op: Operation, params: &Value) -> ToolResult<Value> {
        match op {
            Operation::GetTrustScore => {
                let params = TrustScoreParams::try_from(params)?;
                let attestations = self.fetch_about(&params.address, None).await?;
                let score = self.engine.trust_score(&attestations, &params.address);
                Ok(serde_json::to_value(score)?)
            }
            Operation::GetAttestations => {
                let (_, attestations) = self.query_attestations(params).await?;
                Ok(serde_json::to_value(attestations)?)
            }
            Operation::VerifyCredential => {
                let params = CredentialParams::try_from(params)?;
                let attestations = self
                    .fetch_about(&params.address, Some(&params.claim))
                    .await?;
                let result = self
                    .engine
                    .verify_credential(&attestations, &params.address, &params.claim);
                Ok(serde_json::to_value(result)?)
            }
            Operation::FindTrustedExperts => {
                let params = ExpertParams::try_from(params)?;
                let filters = AttestationFilters::new()
                    .mentioning(params.topic.as_str())
                    .limit(MAX_LIMIT);
                let attestations = self.source.fetch(&filters).await?;
                let experts = self
                    .engine
                    .find_trusted_experts(&attestations, &params.topic, params.limit);
                Ok(serde_json::to_value(experts)?)
            }
        }
    }

    /// One fetch of everything involving `address`, optionally narrowed to a claim.
    async fn fetch_about(&self, address: &str, claim: Option<&str>) -> ToolResult<Vec<Attestation>> {
        let mut filters = AttestationFilters::new().involving(address).limit(MAX_LIMIT);
        if let Some(claim) = claim {
            filters = filters.mentioning(claim);
        }
        Ok(self.source.fetch(&filters).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("gettrustscore"), None);
    }

    #[test]
    fn test_tool_listing() {
        assert_eq!(
            tool_names(),
            vec!["getTrustScore", "getAttestations", "verifyCredential", "findTrustedExperts"]
        );
        let specs = tool_specs();
        assert_eq!(specs.len(), 4);
        let json = serde_json::to_value(&specs[3]).unwrap();
        assert_eq!(json["inputSchema"]["required"], json!(["topic"]));
        assert_eq!(json["inputSchema"]["properties"]["limit"]["maximum"], 100);
        assert_eq!(json["example"]["topic"], "defi");
    }

    #[test]
    fn test_examples_validate() {
        assert!(TrustScoreParams::try_from(&Operation::GetTrustScore.spec().example).is_ok());
        assert!(validate::attestation_filters(&Operation::GetAttestations.spec().example).is_ok());
        assert!(CredentialParams::try_from(&Operation::VerifyCredential.spec().example).is_ok());
        assert!(ExpertParams::try_from(&Operation::FindTrustedExperts.spec().example).is_ok());
    }
}
