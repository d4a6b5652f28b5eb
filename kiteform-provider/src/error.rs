//! Provider error type

use kiteform_client::ClientError;
use kiteform_core::ConfigError;
use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced to the host by a lifecycle operation
///
/// Nothing is retried; each error is terminal for the invocation that
/// raised it. Remote changes made before the error are kept.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Declared configuration is invalid; no remote call was made
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A primary-protocol mutation failed
    #[error("{operation} failed: {source}")]
    RemoteMutation {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    /// A primary-protocol query failed
    #[error("{operation} failed: {source}")]
    RemoteQuery {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    /// A declared team slug does not exist remotely
    #[error("team '{0}' does not exist in the organization")]
    IdentityResolution(String),

    /// The configured organization does not exist or is not visible
    #[error("organization '{0}' not found")]
    OrganizationNotFound(String),

    /// The REST fallback patch failed; the preceding mutation is kept
    #[error("REST fallback patch for pipeline '{slug}' failed: {source}")]
    FallbackPatch {
        slug: String,
        #[source]
        source: ClientError,
    },

    /// The operation needs a remote identifier the resource does not have
    #[error("resource has no remote identifier")]
    MissingId,
}

impl ProviderError {
    pub(crate) fn mutation(operation: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| ProviderError::RemoteMutation { operation, source }
    }

    pub(crate) fn query(operation: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| ProviderError::RemoteQuery { operation, source }
    }
}
