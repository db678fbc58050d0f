//! Attestation type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence assigned to attestations when the source supplies none.
///
/// The upstream graph never reports a confidence; this is a fixed policy
/// value, not a measurement. Deployments have used 0.8 and 0.85.
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Page size applied when a filter carries no limit.
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page a caller may request.
pub const MAX_LIMIT: usize = 1000;

/// An attestation - a claim about a subject, authored by a creator address.
///
/// Attestations are read-only: they are fetched fresh for every request and
/// never mutated or persisted by trustgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    /// Opaque, stable identifier assigned by the source
    pub id: String,

    /// Address that authored the claim
    pub creator: String,

    /// Entity the claim is about
    pub subject: String,

    /// Relationship or claim type (e.g. "expert-in-defi")
    pub predicate: String,

    /// Target value of the claim
    pub object: String,

    /// Seconds since the Unix epoch
    pub timestamp: i64,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Reference to an economic backing record, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stake: Option<String>,

    /// Auxiliary source fields, carried through uninterpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl Attestation {
    /// Lower-cased `predicate + object`, the text sentiment keywords are matched against.
    pub fn claim_text(&self) -> String {
        let mut text = String::with_capacity(self.predicate.len() + self.object.len());
        text.push_str(&self.predicate);
        text.push_str(&self.object);
        text.to_lowercase()
    }

    /// True if `needle` appears in the subject, creator, or object (case-insensitive).
    pub fn involves(&self, needle: &str) -> bool {
        contains_ignore_case(&self.subject, needle)
            || contains_ignore_case(&self.creator, needle)
            || contains_ignore_case(&self.object, needle)
    }

    /// True if `needle` appears in the predicate or object (case-insensitive).
    pub fn mentions(&self, needle: &str) -> bool {
        contains_ignore_case(&self.predicate, needle) || contains_ignore_case(&self.object, needle)
    }
}

impl Default for Attestation {
    fn default() -> Self {
        Self {
            id: String::new(),
            creator: String::new(),
            subject: String::new(),
            predicate: String::new(),
            object: String::new(),
            timestamp: 0,
            confidence: DEFAULT_CONFIDENCE,
            stake: None,
            metadata: None,
        }
    }
}

/// Case-insensitive substring test.
///
/// An empty needle matches everything, mirroring `str::contains`.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Builder for creating attestations
#[derive(Debug, Default)]
pub struct AttestationBuilder {
    attestation: Attestation,
}

impl AttestationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.attestation.id = id.into();
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.attestation.creator = creator.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.attestation.subject = subject.into();
        self
    }

    pub fn predicate(mut self, predicate: impl Into<String>) -> Self {
        self.attestation.predicate = predicate.into();
        self
    }

    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.attestation.object = object.into();
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.attestation.timestamp = timestamp;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.attestation.confidence = confidence;
        self
    }

    pub fn stake(mut self, stake: impl Into<String>) -> Self {
        self.attestation.stake = Some(stake.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attestation
            .metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    pub fn build(self) -> Attestation {
        self.attestation
    }
}

/// Sparse filter over attestations.
///
/// Every field is optional; an absent field imposes no constraint. Text
/// fields are case-insensitive substring matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Confidence floor (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,

    /// Earliest timestamp, Unix seconds (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_timestamp: Option<i64>,

    /// Latest timestamp, Unix seconds (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Internal narrowing: subject, creator, or object contains this value.
    #[serde(skip)]
    pub involving: Option<String>,

    /// Internal narrowing: predicate or object contains this value.
    #[serde(skip)]
    pub mentioning: Option<String>,
}

impl AttestationFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn involving(mut self, value: impl Into<String>) -> Self {
        self.involving = Some(value.into());
        self
    }

    pub fn mentioning(mut self, value: impl Into<String>) -> Self {
        self.mentioning = Some(value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Limit to apply, falling back to [`DEFAULT_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Offset to apply, falling back to 0.
    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Check whether an attestation satisfies every present constraint.
    ///
    /// Pagination is not considered here.
    pub fn matches(&self, attestation: &Attestation) -> bool {
        let text_checks = [
            (&self.creator, &attestation.creator),
            (&self.subject, &attestation.subject),
            (&self.predicate, &attestation.predicate),
            (&self.object, &attestation.object),
        ];
        for (wanted, actual) in text_checks {
            if let Some(wanted) = wanted {
                if !contains_ignore_case(actual, wanted) {
                    return false;
                }
            }
        }

        if let Some(involving) = &self.involving {
            if !attestation.involves(involving) {
                return false;
            }
        }
        if let Some(mentioning) = &self.mentioning {
            if !attestation.mentions(mentioning) {
                return false;
            }
        }

        if let Some(floor) = self.min_confidence {
            if attestation.confidence < floor {
                return false;
            }
        }

        // Check time range
        if let Some(start) = self.from_timestamp {
            if attestation.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.to_timestamp {
            if attestation.timestamp > end {
                return false;
            }
        }

        true
    }
}
