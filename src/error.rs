//! Error types for the queryforge client.

use thiserror::Error;

/// Result type alias for queryforge operations.
pub type Result<T> = std::result::Result<T, QueryForgeError>;

/// Errors surfaced by the queryforge client.
///
/// Form validation failures are intentionally not represented here: they are
/// field-scoped, live in [`crate::validate::ValidationErrors`], and never
/// abort an operation with an error value.
#[derive(Debug, Error)]
pub enum QueryForgeError {
    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the query definition store
    #[error("server error (status {status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// Response body did not match the expected wire shape
    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    /// Operation requires a selected query definition and none is selected
    #[error("no query definition is selected")]
    NoSelection,

    /// Client configuration error (bad base URL, builder misuse)
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl QueryForgeError {
    /// True when the store rejected the request because the slug is already
    /// taken. This is the sole structurally-recognized server error; the
    /// controller remaps it to a field-scoped validation error on `slug`.
    pub fn is_slug_conflict(&self) -> bool {
        match self {
            QueryForgeError::ServerError { message, .. } => {
                message.contains("slug already exists")
            }
            _ => false,
        }
    }
}
