//! Authentication for the query definition store.
//!
//! The admin API accepts HTTP Basic Auth or a bearer token; localhost
//! deployments may run with authentication disabled.

use base64::{engine::general_purpose, Engine as _};

/// Credentials attached to every store request.
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// HTTP Basic Auth (username, password)
    Basic(String, String),

    /// Bearer token authentication
    Bearer(String),

    /// No authentication (localhost bypass)
    None,
}

impl AuthProvider {
    /// HTTP Basic Auth, encoded per RFC 7617
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthProvider::Basic(username.into(), password.into())
    }

    /// Bearer token authentication
    pub fn bearer(token: impl Into<String>) -> Self {
        AuthProvider::Bearer(token.into())
    }

    /// No authentication
    pub fn none() -> Self {
        AuthProvider::None
    }

    /// Attach the appropriate Authorization header to an outgoing request.
    pub(crate) fn apply_to_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            AuthProvider::Basic(username, password) => {
                let encoded =
                    general_purpose::STANDARD.encode(format!("{}:{}", username, password));
                builder.header("Authorization", format!("Basic {}", encoded))
            }
            AuthProvider::Bearer(token) => {
                builder.header("Authorization", format!("Bearer {}", token))
            }
            AuthProvider::None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_encoding() {
        // RFC 7617 example: Aladdin:open sesame
        let auth = AuthProvider::basic("Aladdin", "open sesame");
        match &auth {
            AuthProvider::Basic(u, p) => {
                let encoded = general_purpose::STANDARD.encode(format!("{}:{}", u, p));
                assert_eq!(encoded, "QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
            }
            _ => panic!("expected Basic variant"),
        }
    }
}
