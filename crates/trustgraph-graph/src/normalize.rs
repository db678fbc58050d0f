//! Upstream record normalization
//!
//! Deployments of the indexer disagree on where a value lives: a term may
//! carry its text in `label`, in raw `data`, or only as a `wallet_id`; the
//! author may be `creator.id` or a flat `creator_id`. Each attestation field
//! therefore has an ordered list of [`FieldPath`] strategies and takes the
//! first non-empty value.
//!
//! Normalization is all-or-nothing: one malformed record fails the batch.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use trustgraph_core::{Attestation, RetrievalError, SourceResult};

/// Where to look for a value inside one upstream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// A top-level key
    Key(&'static str),
    /// A key inside a top-level object
    Nested(&'static str, &'static str),
}

impl FieldPath {
    fn lookup<'a>(&self, record: &'a Map<String, Value>) -> Option<&'a Value> {
        match *self {
            FieldPath::Key(key) => record.get(key),
            FieldPath::Nested(outer, inner) => record.get(outer)?.as_object()?.get(inner),
        }
    }

    /// Top-level key this path reads from.
    fn root(&self) -> &'static str {
        match *self {
            FieldPath::Key(key) | FieldPath::Nested(key, _) => key,
        }
    }
}

use FieldPath::{Key, Nested};

pub const ID_PATHS: &[FieldPath] = &[Key("id"), Key("term_id")];
pub const CREATOR_PATHS: &[FieldPath] = &[
    Nested("creator", "id"),
    Key("creator_id"),
    Nested("creator", "wallet_id"),
    Key("creator"),
];
pub const SUBJECT_PATHS: &[FieldPath] = &[
    Nested("subject", "label"),
    Nested("subject", "data"),
    Nested("subject", "wallet_id"),
    Key("subject"),
];
pub const PREDICATE_PATHS: &[FieldPath] = &[
    Nested("predicate", "label"),
    Nested("predicate", "data"),
    Nested("predicate", "wallet_id"),
    Key("predicate"),
];
pub const OBJECT_PATHS: &[FieldPath] = &[
    Nested("object", "label"),
    Nested("object", "data"),
    Nested("object", "wallet_id"),
    Key("object"),
];
pub const TIMESTAMP_PATHS: &[FieldPath] = &[
    Key("block_timestamp"),
    Key("timestamp"),
    Key("created_at"),
];
pub const STAKE_PATHS: &[FieldPath] = &[Key("vault_id"), Nested("vault", "id")];

/// Scalar as text; empty strings, null, and containers yield nothing.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(record: &Map<String, Value>, paths: &[FieldPath]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| path.lookup(record))
        .find_map(text_of)
}

/// Parse Unix seconds from a number, a numeric string, or an RFC 3339 /
/// ISO-8601 timestamp. Naive timestamps are read as UTC.
pub fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(seconds) = s.parse::<i64>() {
                return Some(seconds);
            }
            if let Ok(at) = DateTime::parse_from_rfc3339(s) {
                return Some(at.timestamp());
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|at| at.and_utc().timestamp())
        }
        _ => None,
    }
}

fn required(record: &Map<String, Value>, paths: &[FieldPath], field: &str, index: usize) -> SourceResult<String> {
    first_text(record, paths)
        .ok_or_else(|| RetrievalError::Schema(format!("triple {index}: no value for '{field}'")))
}

/// Normalize one upstream record.
///
/// `id`, `subject`, `predicate`, and `object` are required. A missing
/// creator becomes the empty string and a missing timestamp becomes 0, but
/// a timestamp that is present and unparseable is an error.
pub fn normalize_record(index: usize, record: &Value, default_confidence: f64) -> SourceResult<Attestation> {
    let record = record
        .as_object()
        .ok_or_else(|| RetrievalError::Schema(format!("triple {index} is not an object")))?;

    let id = required(record, ID_PATHS, "id", index)?;
    let subject = required(record, SUBJECT_PATHS, "subject", index)?;
    let predicate = required(record, PREDICATE_PATHS, "predicate", index)?;
    let object = required(record, OBJECT_PATHS, "object", index)?;
    let creator = first_text(record, CREATOR_PATHS).unwrap_or_default();

    let timestamp = match TIMESTAMP_PATHS
        .iter()
        .filter_map(|path| path.lookup(record))
        .find(|v| !v.is_null())
    {
        Some(raw) => parse_timestamp(raw).ok_or_else(|| {
            RetrievalError::Schema(format!("triple {index}: unparseable timestamp {raw}"))
        })?,
        None => 0,
    };

    let stake = first_text(record, STAKE_PATHS);

    let consumed: HashSet<&str> = [
        ID_PATHS,
        CREATOR_PATHS,
        SUBJECT_PATHS,
        PREDICATE_PATHS,
        OBJECT_PATHS,
        TIMESTAMP_PATHS,
        STAKE_PATHS,
    ]
    .iter()
    .flat_map(|paths| paths.iter().map(FieldPath::root))
    .collect();

    let leftovers: HashMap<String, Value> = record
        .iter()
        .filter(|(key, value)| !consumed.contains(key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(Attestation {
        id,
        creator,
        subject,
        predicate,
        object,
        timestamp,
        confidence: default_confidence,
        stake,
        metadata: (!leftovers.is_empty()).then_some(leftovers),
    })
}

/// Normalize a batch of upstream records, in order.
pub fn normalize_triples(records: &[Value], default_confidence: f64) -> SourceResult<Vec<Attestation>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record, default_confidence))
        .collect()
}

/// Pull the `data.triples` array out of a GraphQL response.
///
/// A non-empty `errors` array wins over any data that came with it.
pub fn extract_triples(response: &Value) -> SourceResult<&[Value]> {
    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| e.to_string())
                })
                .collect();
            return Err(RetrievalError::Upstream(messages.join("; ")));
        }
    }

    response
        .get("data")
        .and_then(|data| data.get("triples"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| RetrievalError::Schema("response has no data.triples array".into()))
}
