//! Client entry point with builder-pattern configuration.

use crate::auth::AuthProvider;
use crate::controller::QueryController;
use crate::error::{QueryForgeError, Result};
use crate::store::HttpQueryStore;
use std::time::Duration;

/// Default timeout for store requests.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Admin client for a custom-query backend.
///
/// Use [`QueryForgeClient::builder`] to construct instances with custom
/// configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use queryforge::QueryForgeClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = QueryForgeClient::builder()
///     .base_url("http://localhost:3000")
///     .timeout(std::time::Duration::from_secs(10))
///     .build()?;
///
/// let mut controller = client.controller();
/// controller.refresh().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QueryForgeClient {
    store: HttpQueryStore,
}

impl QueryForgeClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> QueryForgeClientBuilder {
        QueryForgeClientBuilder::new()
    }

    /// The underlying HTTP store, for direct endpoint access
    pub fn store(&self) -> &HttpQueryStore {
        &self.store
    }

    /// Create a lifecycle controller bound to this client's store.
    ///
    /// Each controller owns its own list/form/selection state; create one
    /// per editing session.
    pub fn controller(&self) -> QueryController<HttpQueryStore> {
        QueryController::new(self.store.clone())
    }
}

/// Builder for [`QueryForgeClient`].
#[derive(Debug, Clone)]
pub struct QueryForgeClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    auth: AuthProvider,
}

impl QueryForgeClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            auth: AuthProvider::None,
        }
    }

    /// Base URL of the backend, e.g. `http://localhost:3000`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Request timeout for all store operations (default 30s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Credentials attached to every request (default: none)
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    pub fn build(self) -> Result<QueryForgeClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| QueryForgeError::Configuration("base_url is required".to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(QueryForgeError::Configuration(
                "base_url cannot be empty".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()?;

        Ok(QueryForgeClient {
            store: HttpQueryStore::new(base_url, http_client, self.auth),
        })
    }
}

impl Default for QueryForgeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
