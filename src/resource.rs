//! The resource lifecycle contract.
//!
//! Each resource kind implements [`ResourceLifecycle`]. Only `create` is
//! mandatory; the remaining operations carry host-default bodies and a
//! resource advertises the ones it actually overrides through
//! [`Capabilities`].

use serde_json::Value;

use crate::error::ProviderError;

/// Flags advertising which optional lifecycle operations a resource
/// implements beyond the mandatory `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The resource remaps inputs in `check`.
    pub check: bool,
    /// The resource compares states in `diff`.
    pub diff: bool,
    /// The resource refreshes state in `read`.
    pub read: bool,
    /// The resource mutates in place in `update`.
    pub update: bool,
    /// The resource runs custom logic in `delete`.
    pub delete: bool,
}

impl Capabilities {
    /// Create flags with no optional operations implemented.
    pub fn none() -> Self {
        Self::default()
    }

    /// Mark `check` as implemented.
    pub fn with_check(mut self) -> Self {
        self.check = true;
        self
    }

    /// Mark `diff` as implemented.
    pub fn with_diff(mut self) -> Self {
        self.diff = true;
        self
    }

    /// Mark `read` as implemented.
    pub fn with_read(mut self) -> Self {
        self.read = true;
        self
    }

    /// Mark `update` as implemented.
    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Mark `delete` as implemented.
    pub fn with_delete(mut self) -> Self {
        self.delete = true;
        self
    }
}

/// The result of a create operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResponse {
    /// The identifier of the created resource. Echoes the caller-assigned
    /// name for resources with no external backing system.
    pub id: String,
    /// The materialized state record.
    pub state: Value,
}

impl CreateResponse {
    /// Create a response from an id and a state record.
    pub fn new(id: impl Into<String>, state: Value) -> Self {
        Self {
            id: id.into(),
            state,
        }
    }
}

/// A request to compare prior state against proposed inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRequest {
    /// The identifier of the resource being compared.
    pub id: String,
    /// The state recorded by the last apply.
    pub old_state: Value,
    /// The newly proposed inputs.
    pub new_inputs: Value,
}

impl DiffRequest {
    /// Create a diff request.
    pub fn new(id: impl Into<String>, old_state: Value, new_inputs: Value) -> Self {
        Self {
            id: id.into(),
            old_state,
            new_inputs,
        }
    }
}

/// The outcome of a diff operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiffResponse {
    /// Whether any attribute differs between old state and new inputs.
    pub has_changes: bool,
    /// Whether the old resource must be deleted before its replacement is
    /// created.
    pub delete_before_replace: bool,
    /// Per-attribute detail for the reported changes.
    pub detailed_diff: Vec<AttributeDiff>,
}

impl DiffResponse {
    /// A diff reporting no changes and no replacement.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// A diff reporting the given attribute changes.
    pub fn with_changes(detailed_diff: Vec<AttributeDiff>, delete_before_replace: bool) -> Self {
        Self {
            has_changes: !detailed_diff.is_empty(),
            delete_before_replace,
            detailed_diff,
        }
    }
}

/// A change to a single attribute reported by a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDiff {
    /// The path to the attribute that changed.
    pub path: String,
    /// The value before the change (None if the attribute is being added).
    pub before: Option<Value>,
    /// The value after the change (None if the attribute is being removed).
    pub after: Option<Value>,
}

impl AttributeDiff {
    /// Create a new attribute diff.
    pub fn new(path: impl Into<String>, before: Option<Value>, after: Option<Value>) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }

    /// A diff for a newly added attribute.
    pub fn added(path: impl Into<String>, value: Value) -> Self {
        Self::new(path, None, Some(value))
    }

    /// A diff for a removed attribute.
    pub fn removed(path: impl Into<String>, value: Value) -> Self {
        Self::new(path, Some(value), None)
    }

    /// A diff for a modified attribute.
    pub fn modified(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self::new(path, Some(before), Some(after))
    }
}

/// Trait that each registered resource kind implements.
///
/// Lifecycle calls are independent and carry no shared mutable state; the
/// host may drive them for different resource instances concurrently.
///
/// # Example
///
/// ```ignore
/// use teamcity_provider::{Capabilities, CreateResponse, ProviderError, ResourceLifecycle};
///
/// struct Widget;
///
/// #[async_trait::async_trait]
/// impl ResourceLifecycle for Widget {
///     async fn create(
///         &self,
///         name: &str,
///         inputs: serde_json::Value,
///         preview: bool,
///     ) -> Result<CreateResponse, ProviderError> {
///         Ok(CreateResponse::new(name, inputs))
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ResourceLifecycle: Send + Sync + 'static {
    /// Which optional operations this resource implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    /// Create a new resource instance.
    ///
    /// With `preview` set, the returned state must echo the inputs with all
    /// derived attributes left unset and no side effects performed.
    async fn create(
        &self,
        name: &str,
        inputs: Value,
        preview: bool,
    ) -> Result<CreateResponse, ProviderError>;

    /// Remap and validate raw inputs before they are typed.
    /// Default: inputs pass through unchanged.
    async fn check(&self, name: &str, inputs: Value) -> Result<Value, ProviderError> {
        let _ = name;
        Ok(inputs)
    }

    /// Compare prior state against proposed inputs.
    /// Default: no changes, never delete-before-replace.
    async fn diff(&self, request: DiffRequest) -> Result<DiffResponse, ProviderError> {
        let _ = request;
        Ok(DiffResponse::unchanged())
    }

    /// Refresh state from the backing system.
    /// Default: the recorded state is returned as-is.
    async fn read(&self, id: &str, state: Value) -> Result<Value, ProviderError> {
        let _ = id;
        Ok(state)
    }

    /// Mutate a resource in place.
    /// Default: unimplemented; resources without an update path are replaced.
    async fn update(
        &self,
        id: &str,
        old_state: Value,
        new_inputs: Value,
    ) -> Result<Value, ProviderError> {
        let _ = (old_state, new_inputs);
        Err(ProviderError::Unimplemented(format!(
            "update is not implemented for resource {}",
            id
        )))
    }

    /// Run custom logic when the resource is deleted.
    /// Default: nothing beyond record removal by the host.
    async fn delete(&self, id: &str, state: Value) -> Result<(), ProviderError> {
        let _ = (id, state);
        Ok(())
    }
}
