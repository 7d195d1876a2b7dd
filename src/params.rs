//! Named-parameter discovery and reconciliation for custom query SQL.
//!
//! The scanner is purely syntactic: it has no notion of string literals, so
//! a colon inside `'12:30:00'` is picked up like any other placeholder.
//! That limitation is accepted; the validator and the admin decide what to
//! do with spurious matches.

use crate::models::{ParamType, QueryParameter};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::HashMap;

// Compiled once at startup
static PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":(\w+)").unwrap());

/// Scan `sql` for `:identifier` placeholders and return a stub parameter per
/// distinct name, in first-seen order. Duplicates collapse to one entry.
pub fn extract_parameters(sql: &str) -> Vec<QueryParameter> {
    let mut seen: Vec<QueryParameter> = Vec::new();
    for cap in PARAM_RE.captures_iter(sql) {
        let name = &cap[1];
        if !seen.iter().any(|p| p.name == name) {
            seen.push(QueryParameter::stub(name));
        }
    }
    seen
}

/// Merge previously-edited parameter metadata with the placeholders found in
/// `new_sql`.
///
/// Entries of `previous` whose `:name` still occurs in the raw SQL text are
/// kept verbatim, in their prior order; placeholders with no surviving entry
/// are appended as fresh stubs in first-seen order. Membership is tested
/// against the text rather than the extracted set, so reconciliation stays
/// robust to extraction quirks.
pub fn reconcile_parameters(
    new_sql: &str,
    previous: &[QueryParameter],
) -> Vec<QueryParameter> {
    let mut merged: Vec<QueryParameter> = previous
        .iter()
        .filter(|p| !p.name.is_empty() && new_sql.contains(&format!(":{}", p.name)))
        .cloned()
        .collect();

    for stub in extract_parameters(new_sql) {
        if !merged.iter().any(|p| p.name == stub.name) {
            merged.push(stub);
        }
    }
    merged
}

/// Coerce user-entered test values (all strings) into typed JSON values per
/// the declared parameter contract.
///
/// Numbers are parsed (empty input is omitted; unparseable input falls back
/// to the raw string), booleans map the literal strings `"true"`/`"false"`,
/// dates and strings pass through unchanged. Entries for undeclared names
/// are ignored.
pub fn bind_test_values(
    declared: &[QueryParameter],
    values: &HashMap<String, String>,
) -> Map<String, JsonValue> {
    let mut bound = Map::new();
    for param in declared {
        let Some(raw) = values.get(&param.name) else {
            continue;
        };
        match param.param_type {
            ParamType::Number => {
                if raw.trim().is_empty() {
                    continue;
                }
                match raw.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                    Some(n) => {
                        bound.insert(param.name.clone(), JsonValue::Number(n));
                    }
                    None => {
                        bound.insert(param.name.clone(), JsonValue::String(raw.clone()));
                    }
                }
            }
            ParamType::Boolean => {
                let value = match raw.as_str() {
                    "true" => JsonValue::Bool(true),
                    "false" => JsonValue::Bool(false),
                    other => JsonValue::String(other.to_string()),
                };
                bound.insert(param.name.clone(), value);
            }
            ParamType::Date | ParamType::String => {
                bound.insert(param.name.clone(), JsonValue::String(raw.clone()));
            }
        }
    }
    bound
}
