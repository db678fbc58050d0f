//! Tool parameter validation
//!
//! Every operation takes a JSON object. Validation collects every violated
//! field instead of stopping at the first one, and yields a typed parameter
//! struct on success.
//!
//! Query-string callers send everything as text, so numeric fields accept
//! numeric strings. Strings are trimmed; an empty optional string counts as
//! absent. `null` counts as absent. Unrecognized fields are ignored.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use trustgraph_core::{AttestationFilters, DEFAULT_LIMIT, MAX_LIMIT};

/// Default and ceiling for `findTrustedExperts.limit`.
pub const DEFAULT_EXPERT_LIMIT: usize = 10;
pub const MAX_EXPERT_LIMIT: usize = 100;

/// One violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Parameters rejected, with every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameters: {}", format_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_address(value: &str) -> bool {
    value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Field reader that records violations as it goes.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    fn of(params: &'a Value) -> Result<Self, ValidationError> {
        match params.as_object() {
            Some(map) => Ok(Self {
                map,
                violations: Vec::new(),
            }),
            None => Err(ValidationError {
                violations: vec![FieldViolation::new("params", "must be a JSON object")],
            }),
        }
    }

    fn violate(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    fn present(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    fn optional_string(&mut self, name: &str) -> Option<String> {
        match self.present(name)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            _ => {
                self.violate(name, "must be a string");
                None
            }
        }
    }

    fn required_string(&mut self, name: &str) -> Option<String> {
        if matches!(self.present(name), Some(v) if !v.is_string()) {
            self.violate(name, "must be a string");
            return None;
        }
        let value = self.optional_string(name);
        if value.is_none() {
            self.violate(name, "is required");
        }
        value
    }

    fn address(&mut self, name: &str) -> Option<String> {
        let value = self.required_string(name)?;
        if is_address(&value) {
            Some(value)
        } else {
            self.violate(name, "must be 0x followed by 40 hex digits");
            None
        }
    }

    /// Integer in `[min, max]`; accepts whole numbers and numeric strings.
    fn integer(&mut self, name: &str, min: i64, max: i64) -> Option<i64> {
        let parsed = match self.present(name)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let Some(value) = parsed else {
            self.violate(name, "must be an integer");
            return None;
        };
        if value < min || value > max {
            let message = if max == i64::MAX {
                format!("must be at least {min}")
            } else {
                format!("must be between {min} and {max}")
            };
            self.violate(name, message);
            return None;
        }
        Some(value)
    }

    /// Finite float in `[min, max]`; accepts numbers and numeric strings.
    fn float(&mut self, name: &str, min: f64, max: f64) -> Option<f64> {
        let parsed = match self.present(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(value) if value.is_finite() && (min..=max).contains(&value) => Some(value),
            Some(value) if value.is_finite() => {
                self.violate(name, format!("must be between {min} and {max}"));
                None
            }
            _ => {
                self.violate(name, "must be a number");
                None
            }
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.violations.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

/// `getTrustScore` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustScoreParams {
    pub address: String,
}

/// `verifyCredential` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialParams {
    pub address: String,
    pub claim: String,
}

/// `findTrustedExperts` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertParams {
    pub topic: String,
    pub limit: usize,
}

impl TryFrom<&Value> for TrustScoreParams {
    type Error = ValidationError;

    fn try_from(params: &Value) -> Result<Self, Self::Error> {
        let mut fields = Fields::of(params)?;
        let address = fields.address("address");
        fields.finish(|| Self {
            address: address.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for CredentialParams {
    type Error = ValidationError;

    fn try_from(params: &Value) -> Result<Self, Self::Error> {
        let mut fields = Fields::of(params)?;
        let address = fields.address("address");
        let claim = fields.required_string("claim");
        fields.finish(|| Self {
            address: address.unwrap_or_default(),
            claim: claim.unwrap_or_default(),
        })
    }
}

impl TryFrom<&Value> for ExpertParams {
    type Error = ValidationError;

    fn try_from(params: &Value) -> Result<Self, Self::Error> {
        let mut fields = Fields::of(params)?;
        let topic = fields.required_string("topic");
        let limit = fields.integer("limit", 1, MAX_EXPERT_LIMIT as i64);
        fields.finish(|| Self {
            topic: topic.unwrap_or_default(),
            limit: limit.map_or(DEFAULT_EXPERT_LIMIT, |l| l as usize),
        })
    }
}

/// `getAttestations` parameters, as the filter set handed to the source.
///
/// The returned filters always carry an explicit limit and offset so they
/// can be echoed back to the caller.
pub fn attestation_filters(params: &Value) -> Result<AttestationFilters, ValidationError> {
    let mut fields = Fields::of(params)?;

    let creator = fields.optional_string("creator");
    let subject = fields.optional_string("subject");
    let predicate = fields.optional_string("predicate");
    let object = fields.optional_string("object");
    let min_confidence = fields.float("minConfidence", 0.0, 1.0);
    let from_timestamp = fields.integer("fromTimestamp", 0, i64::MAX);
    let to_timestamp = fields.integer("toTimestamp", 0, i64::MAX);
    let limit = fields.integer("limit", 1, MAX_LIMIT as i64);
    let offset = fields.integer("offset", 0, i64::MAX);

    if let (Some(from), Some(to)) = (from_timestamp, to_timestamp) {
        if from > to {
            fields.violate("fromTimestamp", "must not be after toTimestamp");
        }
    }

    fields.finish(|| AttestationFilters {
        creator,
        subject,
        predicate,
        object,
        min_confidence,
        from_timestamp,
        to_timestamp,
        limit: Some(limit.map_or(DEFAULT_LIMIT, |l| l as usize)),
        offset: Some(offset.map_or(0, |o| o as usize)),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ADDR: &str = "0xAbC0000000000000000000000000000000000001";

    fn fields_of(err: &ValidationError) -> Vec<&str> {
        err.violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_is_address() {
        assert!(is_address(ADDR));
        assert!(!is_address("0xabc"));
        assert!(!is_address("abc0000000000000000000000000000000000000001"));
        assert!(!is_address("0xZZZ0000000000000000000000000000000000001"));
        assert!(!is_address("0x0000000000000000000000000000000000000000ff"));
    }

    #[test]
    fn test_non_object_rejected_first() {
        for params in [json!(null), json!([1, 2]), json!("0xabc"), json!(7)] {
            let err = TrustScoreParams::try_from(&params).unwrap_err();
            assert_eq!(fields_of(&err), vec!["params"]);
        }
    }

    #[test]
    fn test_trust_score_params() {
        let params = TrustScoreParams::try_from(&json!({ "address": format!("  {ADDR} ") })).unwrap();
        assert_eq!(params.address, ADDR);

        let err = TrustScoreParams::try_from(&json!({})).unwrap_err();
        assert_eq!(err.violations, vec![FieldViolation::new("address", "is required")]);

        let err = TrustScoreParams::try_from(&json!({ "address": "vitalik.eth" })).unwrap_err();
        assert_eq!(fields_of(&err), vec!["address"]);
        assert!(err.violations[0].message.contains("40 hex"));

        let err = TrustScoreParams::try_from(&json!({ "address": 42 })).unwrap_err();
        assert_eq!(err.violations, vec![FieldViolation::new("address", "must be a string")]);
    }

    #[test]
    fn test_credential_reports_every_violation() {
        let err = CredentialParams::try_from(&json!({ "address": "nope", "claim": "  " })).unwrap_err();
        assert_eq!(fields_of(&err), vec!["address", "claim"]);
        assert!(err.to_string().starts_with("invalid parameters: address"));
    }

    #[test]
    fn test_validation_error_display_joins_violations() {
        let err = ValidationError {
            violations: vec![
                FieldViolation::new("limit", "must be between 1 and 1000"),
                FieldViolation::new("claim", "is required"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid parameters: limit must be between 1 and 1000; claim is required"
        );
    }

    #[test]
    fn test_expert_limit_bounds() {
        let params = ExpertParams::try_from(&json!({ "topic": "defi" })).unwrap();
        assert_eq!(params.limit, DEFAULT_EXPERT_LIMIT);

        let params = ExpertParams::try_from(&json!({ "topic": "defi", "limit": "100" })).unwrap();
        assert_eq!(params.limit, 100);

        for limit in [json!(0), json!(101), json!(2.5), json!("ten")] {
            let err = ExpertParams::try_from(&json!({ "topic": "defi", "limit": limit })).unwrap_err();
            assert_eq!(fields_of(&err), vec!["limit"]);
        }
    }

    #[test]
    fn test_attestation_filters_defaults() {
        let filters = attestation_filters(&json!({})).unwrap();
        assert_eq!(filters.limit, Some(DEFAULT_LIMIT));
        assert_eq!(filters.offset, Some(0));
        assert_eq!(filters.creator, None);
        assert_eq!(filters.involving, None);
        assert_eq!(filters.mentioning, None);
    }

    #[test]
    fn test_attestation_filters_coerce_query_strings() {
        let filters = attestation_filters(&json!({
            "subject": "0xabc",
            "predicate": "",
            "minConfidence": "0.5",
            "fromTimestamp": "10",
            "toTimestamp": 20,
            "limit": "1000",
            "offset": "5",
        }))
        .unwrap();
        assert_eq!(filters.subject.as_deref(), Some("0xabc"));
        assert_eq!(filters.predicate, None);
        assert_eq!(filters.min_confidence, Some(0.5));
        assert_eq!(filters.from_timestamp, Some(10));
        assert_eq!(filters.to_timestamp, Some(20));
        assert_eq!(filters.limit, Some(1000));
        assert_eq!(filters.offset, Some(5));
    }

    #[test]
    fn test_attestation_filters_bounds() {
        let err = attestation_filters(&json!({ "limit": 0 })).unwrap_err();
        assert_eq!(err.violations, vec![FieldViolation::new("limit", "must be between 1 and 1000")]);

        let err = attestation_filters(&json!({ "limit": 1001 })).unwrap_err();
        assert_eq!(fields_of(&err), vec!["limit"]);

        let err = attestation_filters(&json!({
            "minConfidence": 1.5,
            "offset": -1,
            "creator": 3,
            "fromTimestamp": "later",
        }))
        .unwrap_err();
        assert_eq!(fields_of(&err), vec!["creator", "minConfidence", "fromTimestamp", "offset"]);
    }

    #[test]
    fn test_inverted_time_range() {
        let err = attestation_filters(&json!({ "fromTimestamp": 20, "toTimestamp": 10 })).unwrap_err();
        assert_eq!(
            err.violations,
            vec![FieldViolation::new("fromTimestamp", "must not be after toTimestamp")]
        );
    }
}
