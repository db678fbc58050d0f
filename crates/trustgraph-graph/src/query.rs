//! GraphQL request construction
//!
//! Filters become a Hasura-style boolean expression over `triples`. Text
//! filters use `_ilike` with `%value%`, so they keep the case-insensitive
//! substring semantics of [`AttestationFilters::matches`].
//!
//! Each text clause ORs over every location normalization may read the
//! value from, so the server never drops a record the normalized match
//! would keep. The client re-applies [`AttestationFilters::matches`] after
//! normalization, which also covers `minConfidence`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use trustgraph_core::AttestationFilters;

/// Selection set shared by every triples query.
pub const TRIPLES_QUERY: &str = r#"query Triples($where: triples_bool_exp, $limit: Int!, $offset: Int!) {
  triples(where: $where, limit: $limit, offset: $offset, order_by: {block_timestamp: desc}) {
    id
    term_id
    creator_id
    block_number
    block_timestamp
    transaction_hash
    vault_id
    creator { id label wallet_id }
    subject { id label data wallet_id }
    predicate { id label data wallet_id }
    object { id label data wallet_id }
  }
}"#;

/// Escape LIKE metacharacters and wrap in `%..%`.
pub fn ilike_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn ilike(value: &str) -> Value {
    json!({ "_ilike": ilike_pattern(value) })
}

/// Atom fields an upstream term may carry its text in, in normalization order.
const ATOM_FIELDS: [&str; 3] = ["label", "data", "wallet_id"];

/// `{_or: [{relation: {field: {_ilike}}}, ..]}` for subject, predicate, and object.
fn atom_clause(relation: &str, value: &str) -> Value {
    let alternatives: Vec<Value> = ATOM_FIELDS
        .iter()
        .map(|field| {
            let mut inner = Map::new();
            inner.insert(field.to_string(), ilike(value));
            let mut clause = Map::new();
            clause.insert(relation.to_string(), Value::Object(inner));
            Value::Object(clause)
        })
        .collect();
    json!({ "_or": alternatives })
}

fn creator_clause(value: &str) -> Value {
    json!({
        "_or": [
            { "creator": { "id": ilike(value) } },
            { "creator_id": ilike(value) },
            { "creator": { "wallet_id": ilike(value) } },
        ]
    })
}

fn rfc3339(seconds: i64) -> Value {
    match DateTime::<Utc>::from_timestamp(seconds, 0) {
        Some(at) => Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        // Out of chrono's range; let the server reject it
        None => Value::from(seconds),
    }
}

/// Build the `where` expression for `filters`.
///
/// Returns an empty object when no server-side constraint applies.
pub fn where_clause(filters: &AttestationFilters) -> Value {
    let mut clauses: Vec<Value> = Vec::new();

    if let Some(creator) = &filters.creator {
        clauses.push(creator_clause(creator));
    }
    for (relation, wanted) in [
        ("subject", &filters.subject),
        ("predicate", &filters.predicate),
        ("object", &filters.object),
    ] {
        if let Some(wanted) = wanted {
            clauses.push(atom_clause(relation, wanted));
        }
    }

    if let Some(involving) = &filters.involving {
        clauses.push(json!({
            "_or": [
                atom_clause("subject", involving),
                creator_clause(involving),
                atom_clause("object", involving),
            ]
        }));
    }
    if let Some(mentioning) = &filters.mentioning {
        clauses.push(json!({
            "_or": [
                atom_clause("predicate", mentioning),
                atom_clause("object", mentioning),
            ]
        }));
    }

    let mut range = Map::new();
    if let Some(from) = filters.from_timestamp {
        range.insert("_gte".into(), rfc3339(from));
    }
    if let Some(to) = filters.to_timestamp {
        range.insert("_lte".into(), rfc3339(to));
    }
    if !range.is_empty() {
        clauses.push(json!({ "block_timestamp": range }));
    }

    match clauses.len() {
        0 => json!({}),
        1 => clauses.remove(0),
        _ => json!({ "_and": clauses }),
    }
}

/// Full GraphQL POST body for one fetch.
pub fn request_body(filters: &AttestationFilters) -> Value {
    json!({
        "query": TRIPLES_QUERY,
        "variables": {
            "where": where_clause(filters),
            "limit": filters.effective_limit(),
            "offset": filters.effective_offset(),
        }
    })
}
