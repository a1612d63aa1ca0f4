//! Provider metadata and the resource registry.
//!
//! A [`Provider`] bundles the plugin metadata the host publishes (display
//! name, license, package naming per language, module remapping) with the
//! registered resource kinds, and dispatches lifecycle calls to them by
//! resource token.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::error::ProviderError;
use crate::resource::{CreateResponse, DiffRequest, DiffResponse, ResourceLifecycle};

/// Plugin metadata published to the host.
///
/// The language map carries per-language package naming for the generated
/// SDK bindings (python, nodejs, go, csharp at minimum); its values are
/// free-form JSON consumed by the host's SDK generator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderMetadata {
    /// The provider name, used as the first segment of resource tokens.
    pub name: String,
    /// Human-readable display name.
    pub display_name: String,
    /// SPDX license identifier.
    pub license: String,
    /// Source repository URL.
    pub repository: String,
    /// Publishing organization.
    pub publisher: String,
    /// Homepage URL.
    pub homepage: String,
    /// Where the host downloads the plugin binary from.
    pub plugin_download_url: String,
    /// Per-language package naming for generated SDKs.
    pub language_map: HashMap<String, Value>,
    /// Remapping from internal module names to the public names resources
    /// are exposed under.
    pub module_map: HashMap<String, String>,
}

impl ProviderMetadata {
    /// Create metadata for the named provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the license identifier.
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// Set the source repository URL.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Set the publisher.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    /// Set the homepage URL.
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = homepage.into();
        self
    }

    /// Set the plugin download URL.
    pub fn with_plugin_download_url(mut self, url: impl Into<String>) -> Self {
        self.plugin_download_url = url.into();
        self
    }

    /// Add a per-language package naming entry.
    pub fn with_language(mut self, language: impl Into<String>, options: Value) -> Self {
        self.language_map.insert(language.into(), options);
        self
    }

    /// Expose an internal module under a different public name.
    pub fn with_module_alias(
        mut self,
        internal: impl Into<String>,
        public: impl Into<String>,
    ) -> Self {
        self.module_map.insert(internal.into(), public.into());
        self
    }

    /// Apply the module map to a `provider:module:Kind` token.
    ///
    /// Tokens that do not have three segments are returned unchanged.
    pub fn remap_token(&self, token: &str) -> String {
        let parts: Vec<&str> = token.split(':').collect();
        if parts.len() != 3 {
            return token.to_string();
        }
        let module = self
            .module_map
            .get(parts[1])
            .map(String::as_str)
            .unwrap_or(parts[1]);
        format!("{}:{}:{}", parts[0], module, parts[2])
    }
}

/// A provider plugin: published metadata plus the registered resource kinds.
///
/// Lifecycle calls are dispatched by resource token. Calls for tokens that
/// were never registered fail with [`ProviderError::UnknownResource`].
pub struct Provider {
    metadata: ProviderMetadata,
    resources: HashMap<String, Box<dyn ResourceLifecycle>>,
}

impl Provider {
    /// Create a provider with the given metadata and no resources.
    pub fn new(metadata: ProviderMetadata) -> Self {
        Self {
            metadata,
            resources: HashMap::new(),
        }
    }

    /// Register a resource kind under the given token.
    ///
    /// The token's module segment is remapped through the metadata's module
    /// map, so a resource registered as `teamcity:provider:Random` with a
    /// `provider -> index` alias is exposed as `teamcity:index:Random`.
    pub fn with_resource(
        mut self,
        token: impl Into<String>,
        resource: impl ResourceLifecycle,
    ) -> Self {
        let token = self.metadata.remap_token(&token.into());
        debug!(token = %token, "Registering resource");
        self.resources.insert(token, Box::new(resource));
        self
    }

    /// The published metadata.
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// The tokens of all registered resource kinds, sorted.
    pub fn resource_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.resources.keys().cloned().collect();
        tokens.sort();
        tokens
    }

    fn resource(&self, token: &str) -> Result<&dyn ResourceLifecycle, ProviderError> {
        self.resources
            .get(token)
            .map(|resource| &**resource)
            .ok_or_else(|| ProviderError::UnknownResource(token.to_string()))
    }

    /// Dispatch a create call to the resource registered under `token`.
    #[instrument(skip(self, inputs), name = "provider.create")]
    pub async fn create(
        &self,
        token: &str,
        name: &str,
        inputs: Value,
        preview: bool,
    ) -> Result<CreateResponse, ProviderError> {
        let resource = self.resource(token)?;
        info!(token, name, preview, "Create called");
        match resource.create(name, inputs, preview).await {
            Ok(response) => {
                info!(token, id = %response.id, "Create completed");
                Ok(response)
            }
            Err(e) => {
                error!(token, name, error = %e, "Create failed");
                Err(e)
            }
        }
    }

    /// Dispatch a check call to the resource registered under `token`.
    #[instrument(skip(self, inputs), name = "provider.check")]
    pub async fn check(
        &self,
        token: &str,
        name: &str,
        inputs: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(token)?;
        debug!(token, name, "Check called");
        match resource.check(name, inputs).await {
            Ok(checked) => Ok(checked),
            Err(e) => {
                error!(token, name, error = %e, "Check failed");
                Err(e)
            }
        }
    }

    /// Dispatch a diff call to the resource registered under `token`.
    #[instrument(skip(self, request), name = "provider.diff")]
    pub async fn diff(
        &self,
        token: &str,
        request: DiffRequest,
    ) -> Result<DiffResponse, ProviderError> {
        let resource = self.resource(token)?;
        debug!(token, id = %request.id, "Diff called");
        match resource.diff(request).await {
            Ok(response) => {
                debug!(
                    token,
                    has_changes = response.has_changes,
                    delete_before_replace = response.delete_before_replace,
                    "Diff completed"
                );
                Ok(response)
            }
            Err(e) => {
                error!(token, error = %e, "Diff failed");
                Err(e)
            }
        }
    }

    /// Compare prior and proposed provider configuration.
    ///
    /// Placeholder policy: reports no changes unconditionally, regardless of
    /// the actual difference, and never requires delete-before-replace.
    #[instrument(skip(self, request), name = "provider.diff_config")]
    pub async fn diff_config(&self, request: DiffRequest) -> Result<DiffResponse, ProviderError> {
        let _ = request;
        debug!("DiffConfig called");
        Ok(DiffResponse::unchanged())
    }

    /// Dispatch a read call to the resource registered under `token`.
    #[instrument(skip(self, state), name = "provider.read")]
    pub async fn read(
        &self,
        token: &str,
        id: &str,
        state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(token)?;
        debug!(token, id, "Read called");
        match resource.read(id, state).await {
            Ok(refreshed) => Ok(refreshed),
            Err(e) => {
                error!(token, id, error = %e, "Read failed");
                Err(e)
            }
        }
    }

    /// Dispatch an update call to the resource registered under `token`.
    #[instrument(skip(self, old_state, new_inputs), name = "provider.update")]
    pub async fn update(
        &self,
        token: &str,
        id: &str,
        old_state: Value,
        new_inputs: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(token)?;
        info!(token, id, "Update called");
        match resource.update(id, old_state, new_inputs).await {
            Ok(state) => {
                info!(token, id, "Update completed");
                Ok(state)
            }
            Err(e) => {
                error!(token, id, error = %e, "Update failed");
                Err(e)
            }
        }
    }

    /// Dispatch a delete call to the resource registered under `token`.
    #[instrument(skip(self, state), name = "provider.delete")]
    pub async fn delete(
        &self,
        token: &str,
        id: &str,
        state: Value,
    ) -> Result<(), ProviderError> {
        let resource = self.resource(token)?;
        info!(token, id, "Delete called");
        match resource.delete(id, state).await {
            Ok(()) => {
                info!(token, id, "Delete completed");
                Ok(())
            }
            Err(e) => {
                error!(token, id, error = %e, "Delete failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait::async_trait]
    impl ResourceLifecycle for Echo {
        async fn create(
            &self,
            name: &str,
            inputs: Value,
            _preview: bool,
        ) -> Result<CreateResponse, ProviderError> {
            Ok(CreateResponse::new(name, inputs))
        }
    }

    fn test_metadata() -> ProviderMetadata {
        ProviderMetadata::new("teamcity")
            .with_display_name("Teamcity")
            .with_license("Apache-2.0")
            .with_module_alias("provider", "index")
    }

    #[test]
    fn test_metadata_builder() {
        let metadata = ProviderMetadata::new("teamcity")
            .with_display_name("Teamcity")
            .with_license("Apache-2.0")
            .with_repository("https://github.com/oss4u/pulumi-teamcity-native")
            .with_publisher("Oss4u")
            .with_homepage("https://github.com/oss4u/")
            .with_plugin_download_url("github://api.github.com/oss4u/pulumi-teamcity-native")
            .with_language("nodejs", json!({"packageName": "@oss4u/teamcity"}))
            .with_language("csharp", json!({"rootNamespace": "Oss4u"}));

        assert_eq!(metadata.name, "teamcity");
        assert_eq!(metadata.display_name, "Teamcity");
        assert_eq!(metadata.license, "Apache-2.0");
        assert_eq!(metadata.publisher, "Oss4u");
        assert_eq!(
            metadata.language_map["nodejs"]["packageName"],
            "@oss4u/teamcity"
        );
    }

    #[test]
    fn test_remap_token() {
        let metadata = test_metadata();
        assert_eq!(
            metadata.remap_token("teamcity:provider:Random"),
            "teamcity:index:Random"
        );
        // Unmapped modules pass through.
        assert_eq!(
            metadata.remap_token("teamcity:other:Random"),
            "teamcity:other:Random"
        );
        // Malformed tokens pass through.
        assert_eq!(metadata.remap_token("not-a-token"), "not-a-token");
    }

    #[test]
    fn test_registration_applies_module_map() {
        let provider =
            Provider::new(test_metadata()).with_resource("teamcity:provider:Random", Echo);
        assert_eq!(
            provider.resource_tokens(),
            vec!["teamcity:index:Random".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_dispatches_by_token() {
        let provider =
            Provider::new(test_metadata()).with_resource("teamcity:provider:Random", Echo);

        let response = provider
            .create("teamcity:index:Random", "r1", json!({"length": 8}), false)
            .await
            .unwrap();
        assert_eq!(response.id, "r1");
        assert_eq!(response.state, json!({"length": 8}));
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let provider = Provider::new(test_metadata());
        let err = provider
            .create("teamcity:index:Missing", "r1", json!({}), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
        assert_eq!(err.message(), "teamcity:index:Missing");
    }

    #[tokio::test]
    async fn test_diff_config_always_reports_no_changes() {
        let provider = Provider::new(test_metadata());
        let response = provider
            .diff_config(DiffRequest::new(
                "config",
                json!({"endpoint": "a"}),
                json!({"endpoint": "b"}),
            ))
            .await
            .unwrap();
        assert!(!response.has_changes);
        assert!(!response.delete_before_replace);
        assert!(response.detailed_diff.is_empty());
    }

    #[tokio::test]
    async fn test_update_defaults_to_unimplemented() {
        let provider =
            Provider::new(test_metadata()).with_resource("teamcity:provider:Random", Echo);
        let err = provider
            .update("teamcity:index:Random", "r1", json!({}), json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unimplemented(_)));
    }
}
