//! The random-string placeholder resource.
//!
//! `Random` is the single resource kind this plugin registers. It has no
//! external backing system: create materializes an alphanumeric string of
//! the requested length, and delete is nothing beyond record removal.

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ProviderError;
use crate::provider::{Provider, ProviderMetadata};
use crate::resource::{CreateResponse, ResourceLifecycle};

/// The provider name, used as the first segment of resource tokens.
pub const PROVIDER_NAME: &str = "teamcity";

/// Upper bound on the requested string length. Requests beyond this are
/// rejected rather than allowed to allocate unbounded memory.
pub const MAX_LENGTH: i64 = 1024 * 1024;

/// Desired configuration for a [`RandomString`] instance.
///
/// Immutable once submitted for a given lifecycle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStringArgs {
    /// Desired output string length.
    pub length: i64,
}

/// The materialized state record for a [`RandomString`] instance.
///
/// `result` has exactly `length` characters from `[a-zA-Z0-9]`, or is empty
/// when the record was produced under preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStringState {
    /// The requested length, echoed from the args.
    pub length: i64,
    /// The generated string. Empty under preview.
    #[serde(default)]
    pub result: String,
}

/// The random-string resource kind.
///
/// Only `create` is implemented; all other lifecycle operations use the
/// host defaults, so a `length` change is reported as unchanged by diff.
/// That is the current placeholder policy, kept deliberately.
pub struct RandomString;

#[async_trait::async_trait]
impl ResourceLifecycle for RandomString {
    async fn create(
        &self,
        name: &str,
        inputs: Value,
        preview: bool,
    ) -> Result<CreateResponse, ProviderError> {
        let args: RandomStringArgs = serde_json::from_value(inputs)?;
        validate_length(args.length)?;

        let mut state = RandomStringState {
            length: args.length,
            result: String::new(),
        };
        if !preview {
            state.result = make_random(args.length as usize);
        }
        Ok(CreateResponse::new(name, serde_json::to_value(&state)?))
    }
}

fn validate_length(length: i64) -> Result<(), ProviderError> {
    if length < 0 {
        return Err(ProviderError::InvalidArgument(format!(
            "length must be non-negative, got {}",
            length
        )));
    }
    if length > MAX_LENGTH {
        return Err(ProviderError::InvalidArgument(format!(
            "length must be at most {}, got {}",
            MAX_LENGTH, length
        )));
    }
    Ok(())
}

/// Generate `length` characters drawn independently and uniformly from the
/// 62-character alphanumeric alphabet.
///
/// The generator is seeded from the current time at nanosecond resolution,
/// fresh per call, so concurrent creates need no coordination.
fn make_random(length: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let rng = StdRng::seed_from_u64(nanos);
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Build the teamcity provider plugin: the published metadata plus the
/// single registered resource kind.
pub fn provider() -> Provider {
    Provider::new(
        ProviderMetadata::new(PROVIDER_NAME)
            .with_display_name("Teamcity")
            .with_license("Apache-2.0")
            .with_repository("https://github.com/oss4u/pulumi-teamcity-native")
            .with_publisher("Oss4u")
            .with_homepage("https://github.com/oss4u/")
            .with_plugin_download_url("github://api.github.com/oss4u/pulumi-teamcity-native")
            .with_language(
                "python",
                json!({"Download-URL": "https://github.com/oss4u/pulumi-teamcity-native?VERSION"}),
            )
            .with_language("nodejs", json!({"packageName": "@oss4u/teamcity"}))
            .with_language(
                "go",
                json!({
                    "generateResourceContainerTypes": true,
                    "importBasePath": "github.com/oss4u/pulumi-teamcity-native/sdk/go/teamcity"
                }),
            )
            .with_language("csharp", json!({"rootNamespace": "Oss4u"}))
            .with_module_alias("provider", "index"),
    )
    .with_resource("teamcity:provider:Random", RandomString)
}
