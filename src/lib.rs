//! queryforge — admin client for custom SQL query endpoints.
//!
//! Turns a hand-written SQL statement into a named, parameterized HTTP
//! endpoint on a backend-as-a-service platform. The crate covers the full
//! compilation pipeline and the management lifecycle:
//!
//! - [`slug::generate_slug`] — deterministic slug proposal from a name
//! - [`params::extract_parameters`] / [`params::reconcile_parameters`] —
//!   `:name` placeholder discovery and metadata-preserving merges across
//!   SQL edits
//! - [`classify::classify`] — heuristic HTTP method / readonly inference
//! - [`validate::validate_definition`] — total, field-scoped pre-submission
//!   validation
//! - [`controller::QueryController`] — session state machine over the
//!   definition list and form, driving the remote store
//!
//! Persistence and execution are delegated to the backend via
//! [`store::QueryStore`]; [`client::QueryForgeClient`] wires up the HTTP
//! implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use queryforge::{AuthProvider, QueryForgeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QueryForgeClient::builder()
//!     .base_url("http://localhost:3000")
//!     .auth(AuthProvider::basic("admin".to_string(), "secret".to_string()))
//!     .build()?;
//!
//! let mut ctrl = client.controller();
//! ctrl.refresh().await?;
//!
//! ctrl.begin_create();
//! ctrl.set_name("Daily Report");
//! ctrl.set_sql("SELECT * FROM orders WHERE created_at > :start");
//! if ctrl.submit_create().await? {
//!     println!("created {} definitions", ctrl.queries().len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod classify;
pub mod client;
pub mod controller;
pub mod error;
pub mod models;
pub mod params;
pub mod slug;
pub mod store;
pub mod validate;

pub use auth::AuthProvider;
pub use classify::{classify, Classification};
pub use client::{QueryForgeClient, QueryForgeClientBuilder};
pub use controller::{BusyFlags, Mode, QueryController, QueryForm};
pub use error::{QueryForgeError, Result};
pub use models::{
    HttpMethod, ParamType, QueryDefinition, QueryDraft, QueryParameter, TestExecutionResult,
};
pub use params::{bind_test_values, extract_parameters, reconcile_parameters};
pub use slug::generate_slug;
pub use store::{HttpQueryStore, QueryStore};
pub use validate::{validate_definition, ValidationErrors};
