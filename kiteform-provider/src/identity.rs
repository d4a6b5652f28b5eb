//! Identity resolution
//!
//! Turns human-readable slugs into the opaque identifiers the remote
//! requires in mutations. Every call is a fresh remote lookup; nothing is
//! cached between calls.

use std::sync::Arc;

use async_trait::async_trait;
use kiteform_client::{RemoteGateway, organizations, teams};
use tracing::debug;

use crate::error::{ProviderError, Result};

/// Resolves slugs to remote identifiers
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves a team slug within the configured organization
    ///
    /// # Errors
    /// [`ProviderError::IdentityResolution`] if the team does not exist
    async fn resolve_team(&self, team_slug: &str) -> Result<String>;

    /// Resolves the configured organization
    ///
    /// # Errors
    /// [`ProviderError::OrganizationNotFound`] if it does not exist
    async fn resolve_organization(&self) -> Result<String>;
}

/// [`IdentityResolver`] backed by GraphQL lookups
pub struct GraphqlIdentityResolver {
    gateway: Arc<dyn RemoteGateway>,
    organization: String,
}

impl GraphqlIdentityResolver {
    /// # Arguments
    /// * `gateway` - Remote gateway used for lookups
    /// * `organization` - Organization slug that scopes team lookups
    pub fn new(gateway: Arc<dyn RemoteGateway>, organization: impl Into<String>) -> Self {
        Self {
            gateway,
            organization: organization.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for GraphqlIdentityResolver {
    async fn resolve_team(&self, team_slug: &str) -> Result<String> {
        let id = teams::get_team_id(self.gateway.as_ref(), &self.organization, team_slug)
            .await
            .map_err(ProviderError::query("TeamLookup"))?
            .ok_or_else(|| ProviderError::IdentityResolution(team_slug.to_string()))?;

        debug!("Resolved team {} to {}", team_slug, id);
        Ok(id)
    }

    async fn resolve_organization(&self) -> Result<String> {
        let id = organizations::get_organization_id(self.gateway.as_ref(), &self.organization)
            .await
            .map_err(ProviderError::query("OrganizationLookup"))?
            .ok_or_else(|| ProviderError::OrganizationNotFound(self.organization.clone()))?;

        debug!("Resolved organization {} to {}", self.organization, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockGateway};
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_team_uses_qualified_slug() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond("TeamLookup", json!({ "team": { "id": "T-eng" } }));

        let resolver = GraphqlIdentityResolver::new(gateway.clone(), "acme");
        let id = resolver.resolve_team("eng").await.unwrap();

        assert_eq!(id, "T-eng");
        assert_eq!(
            gateway.calls(),
            vec![Call::Query {
                operation: "TeamLookup",
                variables: json!({ "slug": "acme/eng" }),
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_team_is_identity_error() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond("TeamLookup", json!({ "team": null }));

        let resolver = GraphqlIdentityResolver::new(gateway, "acme");
        let err = resolver.resolve_team("ghost").await.unwrap_err();

        assert!(matches!(err, ProviderError::IdentityResolution(ref slug) if slug == "ghost"));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_query_error() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail("TeamLookup", kiteform_client::ClientError::api_error(500, "boom"));

        let resolver = GraphqlIdentityResolver::new(gateway, "acme");
        let err = resolver.resolve_team("eng").await.unwrap_err();

        assert!(matches!(
            err,
            ProviderError::RemoteQuery {
                operation: "TeamLookup",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_organization() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond("OrganizationLookup", json!({ "organization": { "id": "O-1" } }));
        gateway.respond("OrganizationLookup", json!({ "organization": null }));

        let resolver = GraphqlIdentityResolver::new(gateway, "acme");
        assert_eq!(resolver.resolve_organization().await.unwrap(), "O-1");
        assert!(matches!(
            resolver.resolve_organization().await,
            Err(ProviderError::OrganizationNotFound(ref org)) if org == "acme"
        ));
    }
}
