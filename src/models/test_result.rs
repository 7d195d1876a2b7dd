use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Wire response of `POST /custom-queries/{id}/test`.
#[derive(Debug, Clone, Deserialize)]
pub struct TestExecutionResponse {
    #[serde(default)]
    pub data: Vec<Map<String, JsonValue>>,

    pub row_count: usize,

    /// Execution time in milliseconds as reported by the engine
    pub execution_time: f64,
}

/// Result of an ad hoc test execution. Ephemeral: owned by the session that
/// ran the test, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TestExecutionResult {
    pub rows: Vec<Map<String, JsonValue>>,
    pub row_count: usize,
    pub execution_time_ms: f64,
}

impl From<TestExecutionResponse> for TestExecutionResult {
    fn from(resp: TestExecutionResponse) -> Self {
        Self {
            rows: resp.data,
            row_count: resp.row_count,
            execution_time_ms: resp.execution_time,
        }
    }
}
