use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Declared type of a named query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

/// A named, typed input declared by a custom query.
///
/// Parameter names must be unique within a query and match
/// `^[A-Za-z_][A-Za-z0-9_]*$` (enforced by the validator, not here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,

    #[serde(rename = "type", default)]
    pub param_type: ParamType,

    #[serde(default = "default_required")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default value applied when the caller omits the parameter
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
}

fn default_required() -> bool {
    true
}

impl QueryParameter {
    /// Stub entry produced by the SQL scanner for a newly-discovered
    /// placeholder: string-typed, required, undocumented.
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: ParamType::String,
            required: true,
            description: None,
            default_value: None,
        }
    }
}

/// Normalize a `parameters` value that may arrive pre-parsed as a JSON
/// array or as a serialized JSON string, depending on storage layer quirks.
/// Malformed input yields an empty list, never an error.
pub fn normalize_parameters(raw: &JsonValue) -> Vec<QueryParameter> {
    match raw {
        JsonValue::String(s) => serde_json::from_str(s).unwrap_or_default(),
        other => serde_json::from_value(other.clone()).unwrap_or_default(),
    }
}

/// Serde adapter for [`normalize_parameters`], used on
/// `QueryDefinition::parameters`.
pub(crate) fn deserialize_parameters<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<QueryParameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(normalize_parameters).unwrap_or_default())
}
