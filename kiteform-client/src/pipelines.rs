//! Pipeline endpoints
//!
//! GraphQL operations on pipelines plus the REST fallback for settings the
//! GraphQL API does not accept.

use kiteform_core::dto::pipeline::{
    PipelineCreateInput, PipelineCreatePayload, PipelineDeleteInput, PipelineNode, PipelineQuery,
    PipelineRestPatch, PipelineUpdateInput, PipelineUpdatePayload,
};
use serde_json::json;

use crate::RemoteGateway;
use crate::error::{ClientError, Result};
use crate::graphql::{GraphqlRequest, decode};

/// Maximum number of team grants fetched with a pipeline
pub const TEAM_PAGE_SIZE: usize = 50;

macro_rules! pipeline_fragment {
    () => {
        r#"
fragment PipelineFields on Pipeline {
  id
  name
  description
  defaultBranch
  slug
  webhookURL
  repository { url }
  steps { yaml }
  cancelIntermediateBuilds
  cancelIntermediateBuildsBranchFilter
  skipIntermediateBuilds
  skipIntermediateBuildsBranchFilter
  teams(first: 50) {
    edges { node { id accessLevel team { slug } } }
  }
}"#
    };
}

const READ_PIPELINE: &str = concat!(
    r#"query PipelineRead($id: ID!) {
  node(id: $id) { ... on Pipeline { ...PipelineFields } }
}"#,
    pipeline_fragment!()
);

const CREATE_PIPELINE: &str = concat!(
    r#"mutation PipelineCreate($input: PipelineCreateInput!) {
  pipelineCreate(input: $input) { pipeline { ...PipelineFields } }
}"#,
    pipeline_fragment!()
);

const UPDATE_PIPELINE: &str = concat!(
    r#"mutation PipelineUpdate($input: PipelineUpdateInput!) {
  pipelineUpdate(input: $input) { pipeline { ...PipelineFields } }
}"#,
    pipeline_fragment!()
);

const DELETE_PIPELINE: &str = r#"mutation PipelineDelete($input: PipelineDeleteInput!) {
  pipelineDelete(input: $input) { deletedPipelineID }
}"#;

/// Get a pipeline, including up to [`TEAM_PAGE_SIZE`] team grants
///
/// # Returns
/// `None` when no pipeline exists under `id`
pub async fn get_pipeline(gateway: &dyn RemoteGateway, id: &str) -> Result<Option<PipelineNode>> {
    let request = GraphqlRequest::new("PipelineRead", READ_PIPELINE, json!({ "id": id }));
    let data = gateway.query(request).await?;
    let query: PipelineQuery = decode("PipelineRead", data)?;

    Ok(query.node)
}

/// Create a new pipeline
///
/// # Returns
/// The created pipeline, carrying its remote-assigned identifier
pub async fn create_pipeline(
    gateway: &dyn RemoteGateway,
    input: &PipelineCreateInput,
) -> Result<PipelineNode> {
    let request = GraphqlRequest::with_input("PipelineCreate", CREATE_PIPELINE, input)?;
    let data = gateway.mutate(request).await?;
    let payload: PipelineCreatePayload = decode("PipelineCreate", data)?;

    Ok(payload.pipeline_create.pipeline)
}

/// Update a pipeline
///
/// The input must carry every field; the remote does not merge partial
/// updates.
///
/// # Returns
/// The updated pipeline, including its current team grants
pub async fn update_pipeline(
    gateway: &dyn RemoteGateway,
    input: &PipelineUpdateInput,
) -> Result<PipelineNode> {
    let request = GraphqlRequest::with_input("PipelineUpdate", UPDATE_PIPELINE, input)?;
    let data = gateway.mutate(request).await?;
    let payload: PipelineUpdatePayload = decode("PipelineUpdate", data)?;

    Ok(payload.pipeline_update.pipeline)
}

/// Delete a pipeline
///
/// Team grants on the pipeline are removed by the remote along with it.
pub async fn delete_pipeline(gateway: &dyn RemoteGateway, id: &str) -> Result<()> {
    let input = PipelineDeleteInput { id: id.to_string() };
    let request = GraphqlRequest::with_input("PipelineDelete", DELETE_PIPELINE, &input)?;
    gateway.mutate(request).await?;

    Ok(())
}

/// Patch pipeline settings through the REST API
///
/// # Arguments
/// * `organization` - Organization slug
/// * `slug` - Pipeline slug
/// * `patch` - Settings the GraphQL API cannot express
pub async fn patch_pipeline(
    gateway: &dyn RemoteGateway,
    organization: &str,
    slug: &str,
    patch: &PipelineRestPatch,
) -> Result<()> {
    if slug.is_empty() {
        return Err(ClientError::InvalidRequest(
            "cannot patch a pipeline without a slug".to_string(),
        ));
    }

    let path = format!("organizations/{}/pipelines/{}", organization, slug);
    let body = serde_json::to_value(patch)
        .map_err(|e| ClientError::InvalidRequest(format!("cannot encode patch: {e}")))?;

    gateway.patch(&path, body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_embed_fragment() {
        for document in [READ_PIPELINE, CREATE_PIPELINE, UPDATE_PIPELINE] {
            assert!(document.contains("fragment PipelineFields on Pipeline"));
            assert!(document.contains(&format!("teams(first: {TEAM_PAGE_SIZE})")));
        }
    }
}
