//! Error types for provider implementations.

use thiserror::Error;

/// Errors that can occur when dispatching a resource lifecycle call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A lifecycle input failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested resource token is not registered with the provider.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The resource does not implement the requested lifecycle operation.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    /// A serialization/deserialization error occurred at the args/state boundary.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(msg) => msg,
            Self::UnknownResource(msg) => msg,
            Self::Unimplemented(msg) => msg,
            Self::Serialization(_err) => "serialization error (see Debug output)",
        }
    }
}
