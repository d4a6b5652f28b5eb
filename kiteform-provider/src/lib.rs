//! Kiteform Provider
//!
//! Manages a CI pipeline declared as code and keeps its team access grants in
//! sync with the remote service.
//!
//! Architecture:
//! - [`reconcile`]: pure diff of declared vs. observed team grants
//! - [`applier`]: applies a diff one mutation at a time, stopping at the
//!   first failure
//! - [`identity`]: resolves organization and team slugs to remote ids
//! - [`fallback`]: REST patch for settings the GraphQL API lacks
//! - [`state`]: the host-facing attribute surface and its typed conversion
//! - [`lifecycle`]: create, read, update, delete and import
//!
//! All remote access goes through an injected
//! [`RemoteGateway`](kiteform_client::RemoteGateway); nothing is looked up
//! from global state, so controllers for different resources can run
//! concurrently.

pub mod applier;
pub mod error;
pub mod fallback;
pub mod identity;
pub mod lifecycle;
pub mod reconcile;
pub mod state;

#[cfg(test)]
mod testing;

pub use applier::ReconciliationApplier;
pub use error::{ProviderError, Result};
pub use identity::{GraphqlIdentityResolver, IdentityResolver};
pub use lifecycle::PipelineController;
pub use reconcile::{TeamChanges, reconcile};
pub use state::{PipelineAttributes, ResourceState, TeamAttribute};
