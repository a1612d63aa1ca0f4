//! Testing utilities for provider implementations.
//!
//! This module provides utilities to exercise a [`Provider`] and its
//! registered resources in-process, without a host orchestrator.
//!
//! # Example
//!
//! ```ignore
//! use teamcity_provider::testing::ProviderTester;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_resource() {
//!     let tester = ProviderTester::new(teamcity_provider::provider());
//!
//!     let response = tester
//!         .create("teamcity:index:Random", "r1", json!({"length": 8}))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(response.state["length"], 8);
//! }
//! ```

use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::Provider;
use crate::resource::{CreateResponse, DiffRequest, DiffResponse};

/// A test harness wrapping a [`Provider`].
///
/// Lifecycle calls go through the provider's token dispatch, so tests cover
/// the same path a host would drive.
pub struct ProviderTester {
    provider: Provider,
}

impl ProviderTester {
    /// Create a new tester for the given provider.
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// The tokens of all registered resource kinds.
    pub fn resource_tokens(&self) -> Vec<String> {
        self.provider.resource_tokens()
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Run a dry-run create: the returned state echoes the inputs with
    /// derived attributes unset.
    pub async fn preview(
        &self,
        token: &str,
        name: &str,
        inputs: Value,
    ) -> Result<CreateResponse, ProviderError> {
        self.provider.create(token, name, inputs, true).await
    }

    /// Create a new resource instance (apply mode).
    pub async fn create(
        &self,
        token: &str,
        name: &str,
        inputs: Value,
    ) -> Result<CreateResponse, ProviderError> {
        self.provider.create(token, name, inputs, false).await
    }

    /// Remap and validate raw inputs.
    pub async fn check(
        &self,
        token: &str,
        name: &str,
        inputs: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.check(token, name, inputs).await
    }

    /// Compare prior state against proposed inputs.
    pub async fn diff(
        &self,
        token: &str,
        id: &str,
        old_state: Value,
        new_inputs: Value,
    ) -> Result<DiffResponse, ProviderError> {
        self.provider
            .diff(token, DiffRequest::new(id, old_state, new_inputs))
            .await
    }

    /// Compare prior and proposed provider configuration.
    pub async fn diff_config(
        &self,
        old_config: Value,
        new_config: Value,
    ) -> Result<DiffResponse, ProviderError> {
        self.provider
            .diff_config(DiffRequest::new("config", old_config, new_config))
            .await
    }

    /// Refresh the state of a resource.
    pub async fn read(&self, token: &str, id: &str, state: Value) -> Result<Value, ProviderError> {
        self.provider.read(token, id, state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        token: &str,
        id: &str,
        old_state: Value,
        new_inputs: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.update(token, id, old_state, new_inputs).await
    }

    /// Delete a resource.
    pub async fn delete(&self, token: &str, id: &str, state: Value) -> Result<(), ProviderError> {
        self.provider.delete(token, id, state).await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Run a full create lifecycle: check -> create -> read.
    ///
    /// Returns the final state after read.
    pub async fn lifecycle_create(
        &self,
        token: &str,
        name: &str,
        inputs: Value,
    ) -> Result<Value, ProviderError> {
        let checked = self.check(token, name, inputs).await?;
        let created = self.create(token, name, checked).await?;
        self.read(token, &created.id, created.state).await
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a diff reports no changes and no replacement.
///
/// # Panics
///
/// Panics if the diff has changes or requires delete-before-replace.
pub fn assert_diff_unchanged(diff: &DiffResponse) {
    assert!(
        !diff.has_changes,
        "Expected no changes, but got {} change(s): {:?}",
        diff.detailed_diff.len(),
        diff.detailed_diff.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
    assert!(
        !diff.delete_before_replace,
        "Expected no delete-before-replace, but it was requested"
    );
}

/// Assert that a diff reports changes.
///
/// # Panics
///
/// Panics if the diff has no changes.
pub fn assert_diff_has_changes(diff: &DiffResponse) {
    assert!(
        diff.has_changes,
        "Expected diff to have changes, but got none"
    );
}

/// Assert that a diff has a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the diff does not have a change for the given path.
pub fn assert_diff_changes_attribute(diff: &DiffResponse, path: &str) {
    let has_change = diff.detailed_diff.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected diff to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        diff.detailed_diff.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderMetadata;
    use crate::resource::{AttributeDiff, Capabilities, ResourceLifecycle};
    use serde_json::json;

    // A resource with a real diff, to exercise the tester against something
    // beyond host defaults.
    struct Counter;

    #[async_trait::async_trait]
    impl ResourceLifecycle for Counter {
        fn capabilities(&self) -> Capabilities {
            Capabilities::none().with_diff()
        }

        async fn create(
            &self,
            name: &str,
            inputs: Value,
            preview: bool,
        ) -> Result<CreateResponse, ProviderError> {
            let mut state = inputs;
            if !preview {
                if let Value::Object(ref mut map) = state {
                    map.insert("id".to_string(), json!(name));
                }
            }
            Ok(CreateResponse::new(name, state))
        }

        async fn diff(&self, request: DiffRequest) -> Result<DiffResponse, ProviderError> {
            let old = request.old_state.get("count").cloned();
            let new = request.new_inputs.get("count").cloned();
            if old == new {
                Ok(DiffResponse::unchanged())
            } else {
                Ok(DiffResponse::with_changes(
                    vec![AttributeDiff::new("count", old, new)],
                    false,
                ))
            }
        }
    }

    fn tester() -> ProviderTester {
        ProviderTester::new(
            Provider::new(ProviderMetadata::new("test").with_module_alias("provider", "index"))
                .with_resource("test:provider:Counter", Counter),
        )
    }

    #[test]
    fn test_tester_resource_tokens() {
        assert_eq!(
            tester().resource_tokens(),
            vec!["test:index:Counter".to_string()]
        );
    }

    #[tokio::test]
    async fn test_tester_preview_and_create() {
        let tester = tester();

        let previewed = tester
            .preview("test:index:Counter", "c1", json!({"count": 1}))
            .await
            .unwrap();
        assert_eq!(previewed.state, json!({"count": 1}));

        let created = tester
            .create("test:index:Counter", "c1", json!({"count": 1}))
            .await
            .unwrap();
        assert_eq!(created.state["id"], "c1");
    }

    #[tokio::test]
    async fn test_tester_diff() {
        let tester = tester();

        let unchanged = tester
            .diff(
                "test:index:Counter",
                "c1",
                json!({"count": 1}),
                json!({"count": 1}),
            )
            .await
            .unwrap();
        assert_diff_unchanged(&unchanged);

        let changed = tester
            .diff(
                "test:index:Counter",
                "c1",
                json!({"count": 1}),
                json!({"count": 2}),
            )
            .await
            .unwrap();
        assert_diff_has_changes(&changed);
        assert_diff_changes_attribute(&changed, "count");
    }

    #[tokio::test]
    async fn test_tester_diff_config_is_noop() {
        let diff = tester()
            .diff_config(json!({"a": 1}), json!({"a": 2}))
            .await
            .unwrap();
        assert_diff_unchanged(&diff);
    }

    #[tokio::test]
    async fn test_tester_lifecycle_create() {
        let state = tester()
            .lifecycle_create("test:index:Counter", "c1", json!({"count": 1}))
            .await
            .unwrap();
        assert_eq!(state["count"], 1);
        assert_eq!(state["id"], "c1");
    }

    #[tokio::test]
    async fn test_tester_unknown_token() {
        let err = tester()
            .create("test:index:Missing", "c1", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[test]
    #[should_panic(expected = "Expected no changes")]
    fn test_assert_diff_unchanged_fails() {
        let diff = DiffResponse::with_changes(
            vec![AttributeDiff::modified("count", json!(1), json!(2))],
            false,
        );
        assert_diff_unchanged(&diff);
    }
}
