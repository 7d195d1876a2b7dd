//! Query definition store access over HTTP.
//!
//! [`QueryStore`] is the seam between the lifecycle controller and the
//! backend: the controller only ever talks to the trait, so tests can swap
//! in an in-memory implementation. [`HttpQueryStore`] is the production
//! implementation over the REST store.

use crate::auth::AuthProvider;
use crate::error::{QueryForgeError, Result};
use crate::models::{
    EnabledPatch, ErrorBody, ListQueriesResponse, QueryDefinition, QueryDraft,
    TestExecutionResponse, TestExecutionResult,
};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{Map, Value as JsonValue};
use std::time::Instant;

/// Operations of the query definition store and the test execution engine.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Fetch all custom query definitions
    async fn list(&self) -> Result<Vec<QueryDefinition>>;

    /// Persist a new definition; the store assigns id and timestamps
    async fn create(&self, draft: &QueryDraft) -> Result<QueryDefinition>;

    /// Replace an existing definition
    async fn update(&self, id: &str, draft: &QueryDraft) -> Result<QueryDefinition>;

    /// Partial update of the enabled flag only
    async fn set_enabled(&self, id: &str, is_enabled: bool) -> Result<()>;

    /// Destroy a definition
    async fn delete(&self, id: &str) -> Result<()>;

    /// Run an ad hoc test execution with bound parameter values
    async fn test(
        &self,
        id: &str,
        parameters: &Map<String, JsonValue>,
    ) -> Result<TestExecutionResult>;
}

/// HTTP implementation of [`QueryStore`] against the REST endpoints under
/// `{base_url}/custom-queries`.
///
/// Each request is sent exactly once; transport failures surface to the
/// caller without automatic retry.
#[derive(Debug, Clone)]
pub struct HttpQueryStore {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
}

/// First 80 characters of a SQL statement with newlines flattened, for log
/// lines.
fn sql_preview(sql: &str) -> String {
    let flat = sql.replace(['\n', '\r'], " ");
    if flat.chars().count() > 80 {
        let truncated: String = flat.chars().take(80).collect();
        format!("{}...", truncated)
    } else {
        flat
    }
}

impl HttpQueryStore {
    pub(crate) fn new(base_url: String, http_client: reqwest::Client, auth: AuthProvider) -> Self {
        Self {
            base_url,
            http_client,
            auth,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/custom-queries{}", self.base_url, suffix)
    }

    /// Send a prepared request, logging the attempt and mapping non-2xx
    /// responses to [`QueryForgeError::ServerError`] with the store's
    /// `{"error": ...}` body when it parses.
    async fn send(
        &self,
        method: &str,
        url: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let builder = self.auth.apply_to_request(builder);
        let start = Instant::now();
        debug!("[FORGE_HTTP] Sending {} to {}", method, url);

        let response = builder.send().await?;
        let duration_ms = start.elapsed().as_millis();
        let status = response.status();
        debug!(
            "[FORGE_HTTP] Response received: status={} duration_ms={}",
            status, duration_ms
        );

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ErrorBody>(&error_text) {
            Ok(body) => body.error,
            Err(_) => error_text,
        };
        warn!(
            "[FORGE_HTTP] Server error: status={} message=\"{}\" duration_ms={}",
            status, message, duration_ms
        );
        Err(QueryForgeError::ServerError {
            status_code: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl QueryStore for HttpQueryStore {
    async fn list(&self) -> Result<Vec<QueryDefinition>> {
        let url = self.url("");
        let response = self.send("GET", &url, self.http_client.get(&url)).await?;
        let body: ListQueriesResponse = response.json().await?;
        debug!("[FORGE_HTTP] Listed {} query definitions", body.queries.len());
        Ok(body.queries)
    }

    async fn create(&self, draft: &QueryDraft) -> Result<QueryDefinition> {
        debug!(
            "[FORGE_HTTP] Creating definition slug={} sql=\"{}\" (len={})",
            draft.slug,
            sql_preview(&draft.sql_query),
            draft.sql_query.len()
        );
        let url = self.url("");
        let response = self
            .send("POST", &url, self.http_client.post(&url).json(draft))
            .await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, draft: &QueryDraft) -> Result<QueryDefinition> {
        debug!(
            "[FORGE_HTTP] Updating definition id={} sql=\"{}\" (len={})",
            id,
            sql_preview(&draft.sql_query),
            draft.sql_query.len()
        );
        let url = self.url(&format!("/{}", id));
        let response = self
            .send("PUT", &url, self.http_client.put(&url).json(draft))
            .await?;
        Ok(response.json().await?)
    }

    async fn set_enabled(&self, id: &str, is_enabled: bool) -> Result<()> {
        let url = self.url(&format!("/{}", id));
        let patch = EnabledPatch { is_enabled };
        self.send("PATCH", &url, self.http_client.patch(&url).json(&patch))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("/{}", id));
        self.send("DELETE", &url, self.http_client.delete(&url))
            .await?;
        Ok(())
    }

    async fn test(
        &self,
        id: &str,
        parameters: &Map<String, JsonValue>,
    ) -> Result<TestExecutionResult> {
        let url = self.url(&format!("/{}/test", id));
        let body = serde_json::json!({ "parameters": parameters });
        let response = self
            .send("POST", &url, self.http_client.post(&url).json(&body))
            .await?;
        let wire: TestExecutionResponse = response.json().await?;
        Ok(wire.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_preview_short_passthrough() {
        assert_eq!(sql_preview("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_sql_preview_flattens_newlines() {
        assert_eq!(
            sql_preview("SELECT *\nFROM orders\r\nWHERE id = :uid"),
            "SELECT * FROM orders  WHERE id = :uid"
        );
    }

    /// Long statements are cut at 80 characters with an ellipsis marker
    #[test]
    fn test_sql_preview_truncates_at_80() {
        let sql = format!("SELECT {} FROM t", "x".repeat(200));
        let preview = sql_preview(&sql);
        assert_eq!(preview.chars().count(), 83, "80 chars plus the ellipsis");
        assert!(preview.ends_with("..."));
    }

    /// Truncation counts characters, not bytes, so multibyte SQL cannot
    /// split a code point
    #[test]
    fn test_sql_preview_multibyte_safe() {
        let sql = "é".repeat(100);
        let preview = sql_preview(&sql);
        assert_eq!(preview.chars().count(), 83);
        assert!(preview.starts_with(&"é".repeat(80)));
    }
}
