//! Pre-submission validation of a custom query definition.
//!
//! Pure and total: every rule is evaluated independently (no short-circuit)
//! so the caller always gets the complete error set in one pass. No store or
//! network access happens here.

use crate::controller::QueryForm;
use crate::params::extract_parameters;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").unwrap());
static PARAM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Field-scoped validation messages, keyed by field path
/// (`name`, `slug`, `sql_query`, `parameter_{index}_name`).
///
/// Rebuilt whole on every validation pass; never partially merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate field/message pairs in stable (sorted) field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Validate a complete definition form. Returns an empty set iff the form is
/// acceptable for submission.
pub fn validate_definition(form: &QueryForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }

    if form.slug.trim().is_empty() {
        errors.insert("slug", "Slug is required");
    } else if !SLUG_RE.is_match(&form.slug) {
        errors.insert(
            "slug",
            "Slug may only contain lowercase letters, digits, underscores, and hyphens",
        );
    }

    if form.sql_query.trim().is_empty() {
        errors.insert("sql_query", "SQL query is required");
    } else {
        // Every referenced :name must be declared; report all missing names
        // as one aggregated message.
        let undeclared: Vec<String> = extract_parameters(&form.sql_query)
            .into_iter()
            .map(|p| p.name)
            .filter(|name| !form.parameters.iter().any(|p| &p.name == name))
            .collect();
        if !undeclared.is_empty() {
            errors.insert(
                "sql_query",
                format!("SQL references undeclared parameters: {}", undeclared.join(", ")),
            );
        }
    }

    for (idx, param) in form.parameters.iter().enumerate() {
        if param.name.trim().is_empty() {
            errors.insert(format!("parameter_{}_name", idx), "Parameter name is required");
        } else if !PARAM_NAME_RE.is_match(&param.name) {
            errors.insert(
                format!("parameter_{}_name", idx),
                "Parameter name must start with a letter or underscore and contain only \
                 letters, digits, and underscores",
            );
        }
    }

    errors
}
