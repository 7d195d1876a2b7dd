//! Lifecycle controller for custom query definitions.
//!
//! Owns the in-memory list/selection/form state for one editing session and
//! orchestrates create/update/delete/toggle/test operations against a
//! [`QueryStore`]. Single-threaded by construction: all operations take
//! `&mut self`, and each operation kind carries its own busy flag so a
//! second invocation of the same kind is ignored while one is pending.
//!
//! Error taxonomy (kept strictly separate):
//! - field-scoped validation errors live in [`ValidationErrors`] and block
//!   submission before any network call;
//! - a store rejection whose message contains "slug already exists" is
//!   remapped onto the `slug` validation error;
//! - transport/store failures land in the banner [`QueryController::error`];
//! - test failures land only in [`QueryController::test_error`].

use crate::classify::classify;
use crate::error::{QueryForgeError, Result};
use crate::models::{QueryDefinition, QueryDraft, QueryParameter, TestExecutionResult};
use crate::params::{bind_test_values, reconcile_parameters};
use crate::slug::generate_slug;
use crate::store::QueryStore;
use crate::validate::{validate_definition, ValidationErrors};
use log::{debug, warn};
use std::collections::HashMap;

/// Editable in-memory representation of a query definition.
///
/// `method` and `is_readonly` are absent on purpose: they are derived from
/// the SQL at submission time, never user-set.
#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sql_query: String,
    pub parameters: Vec<QueryParameter>,
    pub cache_ttl_seconds: u32,
    pub is_enabled: bool,
}

impl QueryForm {
    fn from_definition(def: &QueryDefinition) -> Self {
        Self {
            name: def.name.clone(),
            slug: def.slug.clone(),
            description: def.description.clone(),
            sql_query: def.sql_query.clone(),
            parameters: def.parameters.clone(),
            cache_ttl_seconds: def.cache_ttl_seconds,
            is_enabled: def.is_enabled,
        }
    }

    /// Build the create/update payload, deriving method and mutability from
    /// the SQL.
    pub fn to_draft(&self) -> QueryDraft {
        let classification = classify(&self.sql_query);
        QueryDraft {
            slug: self.slug.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            sql_query: self.sql_query.clone(),
            parameters: self.parameters.clone(),
            method: classification.method,
            is_readonly: classification.is_readonly,
            cache_ttl_seconds: self.cache_ttl_seconds,
            is_enabled: self.is_enabled,
        }
    }
}

/// Controller mode: which form flow, if any, is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Creating,
    Editing,
}

/// Per-operation busy flags. Operations of the same kind are mutually
/// exclusive; different kinds may overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyFlags {
    pub fetching: bool,
    pub creating: bool,
    pub updating: bool,
    pub deleting: bool,
    pub testing: bool,
    pub toggling: bool,
}

/// Session-scoped state machine over the custom query list and form.
pub struct QueryController<S: QueryStore> {
    store: S,
    queries: Vec<QueryDefinition>,
    mode: Mode,
    selected_id: Option<String>,
    form: QueryForm,
    /// Once the admin edits the slug by hand, name changes stop re-proposing it
    slug_touched: bool,
    validation_errors: ValidationErrors,
    busy: BusyFlags,
    error: Option<String>,
    pending_delete: Option<String>,
    test_params: HashMap<String, String>,
    test_result: Option<TestExecutionResult>,
    test_error: Option<String>,
}

impl<S: QueryStore> QueryController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            queries: Vec::new(),
            mode: Mode::Idle,
            selected_id: None,
            form: QueryForm::default(),
            slug_touched: false,
            validation_errors: ValidationErrors::new(),
            busy: BusyFlags::default(),
            error: None,
            pending_delete: None,
            test_params: HashMap::new(),
            test_result: None,
            test_error: None,
        }
    }

    // ── State accessors ─────────────────────────────────────────────────

    pub fn queries(&self) -> &[QueryDefinition] {
        &self.queries
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn form(&self) -> &QueryForm {
        &self.form
    }

    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.validation_errors
    }

    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    /// Banner error from the last failed store operation, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn test_result(&self) -> Option<&TestExecutionResult> {
        self.test_result.as_ref()
    }

    pub fn test_error(&self) -> Option<&str> {
        self.test_error.as_deref()
    }

    // ── Form editing ────────────────────────────────────────────────────

    /// Start the create flow with an empty form (cache TTL 0, disabled, no
    /// parameters).
    pub fn begin_create(&mut self) {
        self.mode = Mode::Creating;
        self.selected_id = None;
        self.form = QueryForm::default();
        self.slug_touched = false;
        self.validation_errors = ValidationErrors::new();
        self.clear_test_state();
    }

    /// Select an existing definition for editing. Returns `false` when the
    /// id is not in the loaded list.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(def) = self.queries.iter().find(|q| q.id == id) else {
            warn!("[FORGE_CTRL] select: unknown id {}", id);
            return false;
        };
        self.form = QueryForm::from_definition(def);
        self.selected_id = Some(def.id.clone());
        self.mode = Mode::Editing;
        self.slug_touched = true;
        self.validation_errors = ValidationErrors::new();
        self.clear_test_state();
        true
    }

    /// Abandon the current form flow without persisting.
    pub fn cancel(&mut self) {
        self.mode = Mode::Idle;
        self.selected_id = None;
        self.form = QueryForm::default();
        self.slug_touched = false;
        self.validation_errors = ValidationErrors::new();
    }

    /// Update the name. While creating and with an untouched slug, a fresh
    /// slug is proposed from the new name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
        if self.mode == Mode::Creating && !self.slug_touched {
            self.form.slug = generate_slug(&self.form.name);
        }
    }

    /// Override the proposed slug. Stops further auto-proposals.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.form.slug = slug.into();
        self.slug_touched = true;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.form.description = description;
    }

    pub fn set_cache_ttl_seconds(&mut self, seconds: u32) {
        self.form.cache_ttl_seconds = seconds;
    }

    pub fn set_enabled_flag(&mut self, enabled: bool) {
        self.form.is_enabled = enabled;
    }

    /// Update the SQL text and reconcile the parameter contract: entries
    /// still referenced keep their metadata, dropped references are pruned,
    /// new placeholders are appended as stubs.
    pub fn set_sql(&mut self, sql: impl Into<String>) {
        let sql = sql.into();
        self.form.parameters = reconcile_parameters(&sql, &self.form.parameters);
        self.form.sql_query = sql;
    }

    /// Mutable access to one declared parameter, for metadata edits
    pub fn parameter_mut(&mut self, index: usize) -> Option<&mut QueryParameter> {
        self.form.parameters.get_mut(index)
    }

    /// Derived method/readonly for the current form SQL
    pub fn classification(&self) -> crate::classify::Classification {
        classify(&self.form.sql_query)
    }

    pub fn set_test_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.test_params.insert(name.into(), value.into());
    }

    // ── Store operations ────────────────────────────────────────────────

    /// Reload the full definition list from the store.
    pub async fn refresh(&mut self) -> Result<bool> {
        if self.busy.fetching {
            warn!("[FORGE_CTRL] refresh already in flight, ignoring");
            return Ok(false);
        }
        self.busy.fetching = true;
        self.error = None;

        let result = self.store.list().await;
        self.busy.fetching = false;
        match result {
            Ok(queries) => {
                debug!("[FORGE_CTRL] Loaded {} definitions", queries.len());
                self.queries = queries;
                Ok(true)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Validate and persist a new definition.
    ///
    /// Returns `Ok(true)` when the record was created, `Ok(false)` when
    /// submission was blocked locally (validation failure, slug collision,
    /// busy gate, wrong mode) with the reason left in
    /// [`Self::validation_errors`]. No network call is made when validation
    /// fails.
    pub async fn submit_create(&mut self) -> Result<bool> {
        if self.mode != Mode::Creating {
            warn!("[FORGE_CTRL] submit_create outside create flow, ignoring");
            return Ok(false);
        }
        if self.busy.creating {
            warn!("[FORGE_CTRL] create already in flight, ignoring");
            return Ok(false);
        }

        self.validation_errors = validate_definition(&self.form);
        if !self.validation_errors.is_empty() {
            debug!(
                "[FORGE_CTRL] create blocked by {} validation error(s)",
                self.validation_errors.len()
            );
            return Ok(false);
        }

        self.busy.creating = true;
        self.error = None;
        let result = self.store.create(&self.form.to_draft()).await;
        self.busy.creating = false;
        match result {
            Ok(created) => {
                debug!("[FORGE_CTRL] Created definition id={} slug={}", created.id, created.slug);
                self.queries.push(created);
                self.cancel();
                Ok(true)
            }
            Err(e) => self.handle_submit_failure(e),
        }
    }

    /// Validate and persist changes to the selected definition. Same return
    /// convention as [`Self::submit_create`].
    pub async fn submit_update(&mut self) -> Result<bool> {
        if self.mode != Mode::Editing {
            warn!("[FORGE_CTRL] submit_update outside edit flow, ignoring");
            return Ok(false);
        }
        let Some(id) = self.selected_id.clone() else {
            return Err(QueryForgeError::NoSelection);
        };
        if self.busy.updating {
            warn!("[FORGE_CTRL] update already in flight, ignoring");
            return Ok(false);
        }

        self.validation_errors = validate_definition(&self.form);
        if !self.validation_errors.is_empty() {
            debug!(
                "[FORGE_CTRL] update blocked by {} validation error(s)",
                self.validation_errors.len()
            );
            return Ok(false);
        }

        self.busy.updating = true;
        self.error = None;
        let result = self.store.update(&id, &self.form.to_draft()).await;
        self.busy.updating = false;
        match result {
            Ok(updated) => {
                if let Some(slot) = self.queries.iter_mut().find(|q| q.id == updated.id) {
                    *slot = updated;
                }
                self.cancel();
                Ok(true)
            }
            Err(e) => self.handle_submit_failure(e),
        }
    }

    /// Stage a deletion; nothing is sent until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.pending_delete = Some(id.into());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Issue the staged deletion. The confirmation is consumed whether the
    /// call succeeds or fails; a retry requires a fresh [`Self::request_delete`].
    pub async fn confirm_delete(&mut self) -> Result<bool> {
        let Some(id) = self.pending_delete.clone() else {
            warn!("[FORGE_CTRL] confirm_delete without a staged id, ignoring");
            return Ok(false);
        };
        if self.busy.deleting {
            warn!("[FORGE_CTRL] delete already in flight, ignoring");
            return Ok(false);
        }

        self.busy.deleting = true;
        self.error = None;
        self.pending_delete = None;
        let result = self.store.delete(&id).await;
        self.busy.deleting = false;
        match result {
            Ok(()) => {
                self.queries.retain(|q| q.id != id);
                if self.selected_id.as_deref() == Some(id.as_str()) {
                    self.cancel();
                }
                Ok(true)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Flip the enabled flag of one definition via a partial update, then
    /// reload the list so it reflects the authoritative server state. Does
    /// not run the full validator.
    pub async fn toggle_enabled(&mut self, id: &str) -> Result<bool> {
        if self.busy.toggling {
            warn!("[FORGE_CTRL] toggle already in flight, ignoring");
            return Ok(false);
        }
        let Some(current) = self.queries.iter().find(|q| q.id == id).map(|q| q.is_enabled)
        else {
            warn!("[FORGE_CTRL] toggle_enabled: unknown id {}", id);
            return Ok(false);
        };

        self.busy.toggling = true;
        self.error = None;
        let result = match self.store.set_enabled(id, !current).await {
            Ok(()) => match self.store.list().await {
                Ok(queries) => {
                    self.queries = queries;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        self.busy.toggling = false;
        match result {
            Ok(()) => Ok(true),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run an ad hoc test execution of the selected definition with the
    /// entered parameter values, coerced per the declared types.
    ///
    /// The outcome lands exclusively in [`Self::test_result`] /
    /// [`Self::test_error`]; failures never touch the banner, list, or form.
    /// Returns `Ok(true)` on a successful run, `Ok(false)` when the run
    /// failed or was gated.
    pub async fn run_test(&mut self) -> Result<bool> {
        let Some(id) = self.selected_id.clone() else {
            return Err(QueryForgeError::NoSelection);
        };
        if self.busy.testing {
            warn!("[FORGE_CTRL] test already in flight, ignoring");
            return Ok(false);
        }

        self.busy.testing = true;
        self.test_error = None;
        let bound = bind_test_values(&self.form.parameters, &self.test_params);
        debug!("[FORGE_CTRL] Testing id={} with {} bound parameter(s)", id, bound.len());
        let result = self.store.test(&id, &bound).await;
        self.busy.testing = false;
        match result {
            Ok(test_result) => {
                self.test_result = Some(test_result);
                Ok(true)
            }
            Err(e) => {
                self.test_result = None;
                self.test_error = Some(e.to_string());
                Ok(false)
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn clear_test_state(&mut self) {
        self.test_params.clear();
        self.test_result = None;
        self.test_error = None;
    }

    /// Map a create/update failure: slug collisions become a field-scoped
    /// validation error so the retry loop stays inside the form; anything
    /// else is a banner error. The list is never touched.
    fn handle_submit_failure(&mut self, e: QueryForgeError) -> Result<bool> {
        if e.is_slug_conflict() {
            debug!("[FORGE_CTRL] Slug collision reported by store");
            self.validation_errors
                .insert("slug", "This slug already exists; choose another");
            Ok(false)
        } else {
            self.error = Some(e.to_string());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;

    #[test]
    fn test_draft_derives_method_and_readonly() {
        let form = QueryForm {
            name: "Orders".to_string(),
            slug: "orders".to_string(),
            sql_query: "SELECT * FROM orders".to_string(),
            ..QueryForm::default()
        };
        let draft = form.to_draft();
        assert_eq!(draft.method, HttpMethod::Get);
        assert!(draft.is_readonly);

        let form = QueryForm {
            sql_query: "DELETE FROM orders".to_string(),
            ..form
        };
        let draft = form.to_draft();
        assert_eq!(draft.method, HttpMethod::Post);
        assert!(!draft.is_readonly);
    }
}
