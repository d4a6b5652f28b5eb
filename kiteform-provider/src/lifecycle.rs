//! Pipeline lifecycle
//!
//! [`PipelineController`] implements the host's create, read, update, delete
//! and import callbacks. It keeps no state between invocations: everything
//! it knows about a pipeline comes from the [`ResourceState`] the host hands
//! in and from the remote.

use std::sync::Arc;

use kiteform_client::{ClientError, RemoteGateway, pipelines};
use kiteform_core::domain::pipeline::{PipelineRecord, PipelineSpec};
use kiteform_core::domain::team::TeamGrant;
use kiteform_core::dto::pipeline::{PipelineCreateInput, PipelineUpdateInput};
use tracing::{debug, error, info, warn};

use crate::applier::ReconciliationApplier;
use crate::error::{ProviderError, Result};
use crate::fallback::apply_rest_fallback;
use crate::identity::IdentityResolver;
use crate::reconcile::{TeamChanges, reconcile};
use crate::state::ResourceState;

/// Drives a pipeline resource through its lifecycle
pub struct PipelineController {
    gateway: Arc<dyn RemoteGateway>,
    resolver: Arc<dyn IdentityResolver>,
    applier: ReconciliationApplier,
    organization: String,
}

impl PipelineController {
    /// Creates a controller
    ///
    /// # Arguments
    /// * `gateway` - Remote gateway for both protocols
    /// * `resolver` - Resolves organization and team slugs
    /// * `organization` - Organization slug, used by the REST fallback
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        resolver: Arc<dyn IdentityResolver>,
        organization: impl Into<String>,
    ) -> Self {
        let applier = ReconciliationApplier::new(gateway.clone(), resolver.clone());
        Self {
            gateway,
            resolver,
            applier,
            organization: organization.into(),
        }
    }

    /// Creates the pipeline declared in `state`
    ///
    /// The remote identifier is stored in `state` as soon as the pipeline
    /// exists. A later failure (team grants, REST fallback) is returned but
    /// the pipeline stays created and `state` keeps its identifier.
    pub async fn create(&self, state: &mut ResourceState) -> Result<()> {
        let spec = state.attributes.to_spec()?;
        let organization_id = self.resolver.resolve_organization().await?;

        info!("Creating pipeline {} ...", spec.name);
        let input = PipelineCreateInput::new(organization_id, &spec);
        let record: PipelineRecord = pipelines::create_pipeline(self.gateway.as_ref(), &input)
            .await
            .inspect_err(|e| error!("Unable to create pipeline {}: {}", spec.name, e))
            .map_err(ProviderError::mutation("PipelineCreate"))?
            .into();

        info!("Pipeline created: {} ({})", record.slug, record.id);
        state.id = Some(record.id.clone());

        // A new pipeline has no grants yet
        self.converge(state, &spec, &record, &[]).await?;

        self.read(state).await
    }

    /// Refreshes `state` from the remote
    ///
    /// If the pipeline no longer exists, the identifier is cleared so the
    /// host can drop the resource.
    pub async fn read(&self, state: &mut ResourceState) -> Result<()> {
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;

        let node = pipelines::get_pipeline(self.gateway.as_ref(), &id)
            .await
            .map_err(ProviderError::query("PipelineRead"))?;

        match node {
            Some(node) => {
                let record: PipelineRecord = node.into();
                warn_if_truncated(&record);
                debug!(
                    "Read pipeline {} ({} team grants)",
                    record.slug,
                    record.teams.len()
                );
                state.attributes.apply_record(&record);
            }
            None => {
                warn!("Pipeline {} no longer exists, removing it from state", id);
                state.id = None;
            }
        }

        Ok(())
    }

    /// Pushes the declaration in `state` to the remote
    ///
    /// Every field is sent, since the remote replaces rather than merges.
    /// Team grants are reconciled against those returned by the update.
    pub async fn update(&self, state: &mut ResourceState) -> Result<()> {
        let spec = state.attributes.to_spec()?;
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;

        info!("Updating pipeline {} ...", spec.name);
        let input = PipelineUpdateInput::new(id, &spec);
        let record: PipelineRecord = pipelines::update_pipeline(self.gateway.as_ref(), &input)
            .await
            .inspect_err(|e| error!("Unable to update pipeline {}: {}", spec.name, e))
            .map_err(ProviderError::mutation("PipelineUpdate"))?
            .into();
        warn_if_truncated(&record);

        self.converge(state, &spec, &record, &record.teams).await?;

        self.read(state).await
    }

    /// Deletes the pipeline; its grants go with it
    pub async fn delete(&self, state: &mut ResourceState) -> Result<()> {
        let id = state.id.clone().ok_or(ProviderError::MissingId)?;

        info!("Deleting pipeline {} ...", state.attributes.name);
        pipelines::delete_pipeline(self.gateway.as_ref(), &id)
            .await
            .inspect_err(|e| error!("Unable to delete pipeline {}: {}", state.attributes.name, e))
            .map_err(ProviderError::mutation("PipelineDelete"))?;

        info!("Pipeline deleted: {}", id);
        state.id = None;
        Ok(())
    }

    /// Adopts an existing pipeline by its remote identifier
    pub async fn import(&self, id: &str) -> Result<ResourceState> {
        let mut state = ResourceState::from_id(id);
        self.read(&mut state).await?;

        if state.id.is_none() {
            return Err(ProviderError::RemoteQuery {
                operation: "PipelineRead",
                source: ClientError::NotFound(format!("pipeline {id}")),
            });
        }

        Ok(state)
    }

    /// Computes the team changes an update would apply, without applying them
    pub async fn plan(&self, state: &ResourceState) -> Result<TeamChanges> {
        let spec = state.attributes.to_spec()?;
        let id = state.id.as_deref().ok_or(ProviderError::MissingId)?;

        let record: PipelineRecord = pipelines::get_pipeline(self.gateway.as_ref(), id)
            .await
            .map_err(ProviderError::query("PipelineRead"))?
            .ok_or_else(|| ProviderError::RemoteQuery {
                operation: "PipelineRead",
                source: ClientError::NotFound(format!("pipeline {id}")),
            })?
            .into();
        warn_if_truncated(&record);

        Ok(reconcile(&spec.teams, &record.teams))
    }

    /// Reconciles grants, records computed fields, then runs the REST
    /// fallback
    async fn converge(
        &self,
        state: &mut ResourceState,
        spec: &PipelineSpec,
        record: &PipelineRecord,
        observed: &[TeamGrant],
    ) -> Result<()> {
        let changes = reconcile(&spec.teams, observed);
        debug!("Team changes for {}: {:?}", record.slug, changes);

        self.applier
            .apply(&record.id, &changes)
            .await
            .inspect_err(|_| error!("Unable to reconcile team pipelines"))?;

        state.attributes.slug = record.slug.clone();
        state.attributes.webhook_url = record.webhook_url.clone();

        apply_rest_fallback(
            self.gateway.as_ref(),
            &self.organization,
            &record.slug,
            spec,
        )
        .await
    }
}

/// Whether the grant list may have been cut off at the page size
fn teams_truncated(record: &PipelineRecord) -> bool {
    record.teams.len() >= pipelines::TEAM_PAGE_SIZE
}

fn warn_if_truncated(record: &PipelineRecord) {
    if teams_truncated(record) {
        warn!(
            "Pipeline {} returned {} team grants, the page limit; grants past it are not reconciled",
            record.slug,
            record.teams.len()
        );
    }
}
