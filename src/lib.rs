//! Teamcity provider plugin.
//!
//! This crate implements the provider side of an infrastructure-as-code
//! host's plugin contract: published provider metadata, a resource registry
//! with token-based dispatch, and a single registered resource kind — a
//! random-string generator used as a placeholder while real resources are
//! built out.
//!
//! The host's gRPC server, schema derivation, and multi-language SDK
//! generation live in the host framework, not here. The crate exposes:
//!
//! - **ResourceLifecycle trait**: the create/check/diff/read/update/delete
//!   contract a resource kind implements (`create` is mandatory, the rest
//!   have host-default bodies)
//! - **Provider registry**: metadata plus registered resources, dispatching
//!   lifecycle calls by `provider:module:Kind` token
//! - **Random resource**: generates an alphanumeric string of the requested
//!   length; dry-run previews echo the inputs without drawing randomness
//! - **Error types**: common error types for lifecycle implementations
//! - **Logging**: integration with `tracing` for structured logging
//! - **Testing**: an in-process harness for driving a provider without a host
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use teamcity_provider::provider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), teamcity_provider::ProviderError> {
//! let provider = provider();
//!
//! // Preview: no randomness is drawn, result stays empty.
//! let previewed = provider
//!     .create("teamcity:index:Random", "r1", json!({"length": 8}), true)
//!     .await?;
//! assert_eq!(previewed.state["result"], "");
//!
//! // Apply: result is exactly 8 alphanumeric characters.
//! let created = provider
//!     .create("teamcity:index:Random", "r1", json!({"length": 8}), false)
//!     .await?;
//! assert_eq!(created.state["result"].as_str().unwrap().len(), 8);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod logging;
pub mod provider;
pub mod random;
pub mod resource;
pub mod testing;

// Re-export main types at crate root
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{Provider, ProviderMetadata};
pub use random::{provider, RandomString, RandomStringArgs, RandomStringState, PROVIDER_NAME};
pub use resource::{
    AttributeDiff, Capabilities, CreateResponse, DiffRequest, DiffResponse, ResourceLifecycle,
};

// Re-export async_trait for convenience
pub use async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
