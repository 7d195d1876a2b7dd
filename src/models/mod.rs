//! Data models for the queryforge client.
//!
//! Defines the query definition domain types and the request/response
//! structures exchanged with the definition store and execution engine.

pub mod query_definition;
pub mod query_parameter;
pub mod test_result;

pub use query_definition::{
    EnabledPatch, ErrorBody, HttpMethod, ListQueriesResponse, QueryDefinition, QueryDraft,
};
pub use query_parameter::{normalize_parameters, ParamType, QueryParameter};
pub use test_result::{TestExecutionResponse, TestExecutionResult};
