use super::query_parameter::{deserialize_parameters, QueryParameter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// HTTP method a custom query endpoint is served under.
///
/// Derived from the SQL by the classifier; never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HttpMethod {
    #[default]
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

/// A persisted custom query definition as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefinition {
    /// Store-assigned opaque identifier
    pub id: String,

    /// URL-safe public path segment; globally unique among definitions
    pub slug: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub sql_query: String,

    /// Declared parameter contract. Tolerates the wire value arriving as a
    /// pre-parsed array or a serialized JSON string; malformed input
    /// normalizes to an empty list.
    #[serde(default, deserialize_with = "deserialize_parameters")]
    pub parameters: Vec<QueryParameter>,

    #[serde(default)]
    pub method: HttpMethod,

    #[serde(default)]
    pub is_readonly: bool,

    #[serde(default)]
    pub cache_ttl_seconds: u32,

    #[serde(default)]
    pub is_enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload: the definition fields minus id and timestamps.
///
/// `method` and `is_readonly` are filled in from the classifier at
/// submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDraft {
    pub slug: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub sql_query: String,
    pub parameters: Vec<QueryParameter>,
    pub method: HttpMethod,
    pub is_readonly: bool,
    pub cache_ttl_seconds: u32,
    pub is_enabled: bool,
}

/// Response envelope of `GET /custom-queries`.
#[derive(Debug, Deserialize)]
pub struct ListQueriesResponse {
    pub queries: Vec<QueryDefinition>,
}

/// Error body shape returned by the store on 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Partial-update payload for the enable toggle.
#[derive(Debug, Serialize)]
pub struct EnabledPatch {
    pub is_enabled: bool,
}
