//! Reconciliation applier
//!
//! Executes [`TeamChanges`] against the remote one mutation at a time. The
//! remote has no batch or transaction primitive, so the first failure stops
//! the batch and everything applied before it stays applied. Re-running
//! reconciliation is the recovery path.

use std::sync::Arc;

use kiteform_client::{RemoteGateway, teams};
use kiteform_core::domain::team::{AccessGrant, TeamGrant};
use kiteform_core::dto::team::TeamPipelineCreateInput;
use tracing::{error, info};

use crate::error::{ProviderError, Result};
use crate::identity::IdentityResolver;
use crate::reconcile::TeamChanges;

/// Applies team grant changes to a pipeline
pub struct ReconciliationApplier {
    gateway: Arc<dyn RemoteGateway>,
    resolver: Arc<dyn IdentityResolver>,
}

impl ReconciliationApplier {
    pub fn new(gateway: Arc<dyn RemoteGateway>, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { gateway, resolver }
    }

    /// Applies `changes` to the pipeline `pipeline_id`
    ///
    /// Adds run first, in declaration order, then updates, then deletes.
    /// Returns the first error; earlier mutations are not rolled back.
    pub async fn apply(&self, pipeline_id: &str, changes: &TeamChanges) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        info!(
            "Reconciling teams on pipeline {}: {} to add, {} to update, {} to delete",
            pipeline_id,
            changes.to_add.len(),
            changes.to_update.len(),
            changes.to_delete.len()
        );

        for grant in &changes.to_add {
            self.add(pipeline_id, grant).await?;
        }

        for grant in &changes.to_update {
            self.update(grant).await?;
        }

        for grant in &changes.to_delete {
            self.delete(grant).await?;
        }

        Ok(())
    }

    async fn add(&self, pipeline_id: &str, grant: &AccessGrant) -> Result<()> {
        info!(
            "Granting team {} {} access to pipeline {}",
            grant.team_slug, grant.access_level, pipeline_id
        );

        let team_id = self
            .resolver
            .resolve_team(&grant.team_slug)
            .await
            .inspect_err(|e| error!("Unable to resolve team {}: {}", grant.team_slug, e))?;

        let input = TeamPipelineCreateInput {
            team_id,
            pipeline_id: pipeline_id.to_string(),
            access_level: grant.access_level,
        };

        let id = teams::create_team_pipeline(self.gateway.as_ref(), &input)
            .await
            .inspect_err(|e| error!("Unable to grant team {}: {}", grant.team_slug, e))
            .map_err(ProviderError::mutation("TeamPipelineCreate"))?;

        info!("Team {} granted ({})", grant.team_slug, id);
        Ok(())
    }

    async fn update(&self, grant: &TeamGrant) -> Result<()> {
        info!(
            "Updating team {} to {} (grant {})",
            grant.team_slug, grant.access_level, grant.id
        );

        teams::update_team_pipeline(self.gateway.as_ref(), &grant.id, grant.access_level)
            .await
            .inspect_err(|e| error!("Unable to update grant {}: {}", grant.id, e))
            .map_err(ProviderError::mutation("TeamPipelineUpdate"))
    }

    async fn delete(&self, grant: &TeamGrant) -> Result<()> {
        info!(
            "Removing team {} access (grant {})",
            grant.team_slug, grant.id
        );

        teams::delete_team_pipeline(self.gateway.as_ref(), &grant.id)
            .await
            .inspect_err(|e| error!("Unable to delete grant {}: {}", grant.id, e))
            .map_err(ProviderError::mutation("TeamPipelineDelete"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::GraphqlIdentityResolver;
    use crate::testing::{Call, MockGateway};
    use kiteform_client::ClientError;
    use kiteform_core::domain::team::AccessLevel;
    use serde_json::json;

    fn applier(gateway: &Arc<MockGateway>) -> ReconciliationApplier {
        let resolver = Arc::new(GraphqlIdentityResolver::new(gateway.clone(), "acme"));
        ReconciliationApplier::new(gateway.clone(), resolver)
    }

    fn created(id: &str) -> serde_json::Value {
        json!({ "teamPipelineCreate": { "teamPipeline": { "id": id } } })
    }

    #[tokio::test]
    async fn test_empty_changes_make_no_calls() {
        let gateway = Arc::new(MockGateway::new());
        applier(&gateway)
            .apply("p1", &TeamChanges::default())
            .await
            .unwrap();

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_applies_add_update_delete_in_order() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond("TeamLookup", json!({ "team": { "id": "T-ops" } }));
        gateway.respond("TeamPipelineCreate", created("g-new"));
        gateway.respond(
            "TeamPipelineUpdate",
            json!({ "teamPipelineUpdate": { "teamPipeline": { "id": "g1" } } }),
        );
        gateway.respond(
            "TeamPipelineDelete",
            json!({ "teamPipelineDelete": { "deletedTeamPipelineID": "g2" } }),
        );

        let changes = TeamChanges {
            to_add: vec![AccessGrant::new("ops", AccessLevel::BuildAndRead)],
            to_update: vec![TeamGrant::new("g1", "eng", AccessLevel::ManageBuildAndRead)],
            to_delete: vec![TeamGrant::new("g2", "qa", AccessLevel::ReadOnly)],
        };

        applier(&gateway).apply("p1", &changes).await.unwrap();

        assert_eq!(
            gateway.operations(),
            vec![
                "TeamLookup",
                "TeamPipelineCreate",
                "TeamPipelineUpdate",
                "TeamPipelineDelete"
            ]
        );

        let calls = gateway.calls();
        assert_eq!(
            calls[1],
            Call::Mutate {
                operation: "TeamPipelineCreate",
                variables: json!({ "input": {
                    "teamID": "T-ops",
                    "pipelineID": "p1",
                    "accessLevel": "BUILD_AND_READ"
                }}),
            }
        );
        assert_eq!(
            calls[2],
            Call::Mutate {
                operation: "TeamPipelineUpdate",
                variables: json!({ "input": { "id": "g1", "accessLevel": "MANAGE_BUILD_AND_READ" } }),
            }
        );
        assert_eq!(
            calls[3],
            Call::Mutate {
                operation: "TeamPipelineDelete",
                variables: json!({ "input": { "id": "g2" } }),
            }
        );
    }

    #[tokio::test]
    async fn test_unresolvable_team_aborts_after_earlier_adds() {
        // "eng" is declared before "ghost", so it is created first and stays
        let gateway = Arc::new(MockGateway::new());
        gateway.respond("TeamLookup", json!({ "team": { "id": "T-eng" } }));
        gateway.respond("TeamPipelineCreate", created("g-eng"));
        gateway.respond("TeamLookup", json!({ "team": null }));

        let changes = TeamChanges {
            to_add: vec![
                AccessGrant::new("eng", AccessLevel::ReadOnly),
                AccessGrant::new("ghost", AccessLevel::ReadOnly),
            ],
            to_update: vec![],
            to_delete: vec![TeamGrant::new("g9", "qa", AccessLevel::ReadOnly)],
        };

        let err = applier(&gateway).apply("p1", &changes).await.unwrap_err();

        assert!(matches!(err, ProviderError::IdentityResolution(ref slug) if slug == "ghost"));
        assert_eq!(
            gateway.operations(),
            vec!["TeamLookup", "TeamPipelineCreate", "TeamLookup"]
        );
    }

    #[tokio::test]
    async fn test_update_failure_stops_deletes() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail(
            "TeamPipelineUpdate",
            ClientError::GraphqlErrors(vec!["Not authorized".to_string()]),
        );

        let changes = TeamChanges {
            to_add: vec![],
            to_update: vec![TeamGrant::new("g1", "eng", AccessLevel::BuildAndRead)],
            to_delete: vec![TeamGrant::new("g2", "qa", AccessLevel::ReadOnly)],
        };

        let err = applier(&gateway).apply("p1", &changes).await.unwrap_err();

        assert!(matches!(
            err,
            ProviderError::RemoteMutation {
                operation: "TeamPipelineUpdate",
                ..
            }
        ));
        assert_eq!(gateway.operations(), vec!["TeamPipelineUpdate"]);
    }
}
