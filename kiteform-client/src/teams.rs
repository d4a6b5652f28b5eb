//! Team and team-pipeline endpoints

use kiteform_core::domain::team::AccessLevel;
use kiteform_core::dto::team::{
    TeamLookup, TeamPipelineCreateInput, TeamPipelineCreatePayload, TeamPipelineDeleteInput,
    TeamPipelineUpdateInput, TeamPipelineUpdatePayload,
};
use serde_json::json;

use crate::RemoteGateway;
use crate::error::Result;
use crate::graphql::{GraphqlRequest, decode};

const TEAM_LOOKUP: &str = r#"query TeamLookup($slug: ID!) {
  team(slug: $slug) { id }
}"#;

const CREATE_TEAM_PIPELINE: &str = r#"mutation TeamPipelineCreate($input: TeamPipelineCreateInput!) {
  teamPipelineCreate(input: $input) { teamPipeline { id } }
}"#;

const UPDATE_TEAM_PIPELINE: &str = r#"mutation TeamPipelineUpdate($input: TeamPipelineUpdateInput!) {
  teamPipelineUpdate(input: $input) { teamPipeline { id } }
}"#;

const DELETE_TEAM_PIPELINE: &str = r#"mutation TeamPipelineDelete($input: TeamPipelineDeleteInput!) {
  teamPipelineDelete(input: $input) { deletedTeamPipelineID }
}"#;

/// Look up a team's opaque identifier
///
/// # Arguments
/// * `organization` - Organization slug
/// * `team_slug` - Team slug within the organization
///
/// # Returns
/// `None` when the organization has no such team
pub async fn get_team_id(
    gateway: &dyn RemoteGateway,
    organization: &str,
    team_slug: &str,
) -> Result<Option<String>> {
    let qualified = format!("{}/{}", organization, team_slug);
    let request = GraphqlRequest::new("TeamLookup", TEAM_LOOKUP, json!({ "slug": qualified }));
    let data = gateway.query(request).await?;
    let lookup: TeamLookup = decode("TeamLookup", data)?;

    Ok(lookup.team.map(|team| team.id))
}

/// Grant a team access to a pipeline
///
/// # Returns
/// The identifier of the new grant
pub async fn create_team_pipeline(
    gateway: &dyn RemoteGateway,
    input: &TeamPipelineCreateInput,
) -> Result<String> {
    let request = GraphqlRequest::with_input("TeamPipelineCreate", CREATE_TEAM_PIPELINE, input)?;
    let data = gateway.mutate(request).await?;
    let payload: TeamPipelineCreatePayload = decode("TeamPipelineCreate", data)?;

    Ok(payload.team_pipeline_create.team_pipeline.id)
}

/// Change the access level of an existing grant
pub async fn update_team_pipeline(
    gateway: &dyn RemoteGateway,
    id: &str,
    access_level: AccessLevel,
) -> Result<()> {
    let input = TeamPipelineUpdateInput {
        id: id.to_string(),
        access_level,
    };
    let request = GraphqlRequest::with_input("TeamPipelineUpdate", UPDATE_TEAM_PIPELINE, &input)?;
    let data = gateway.mutate(request).await?;
    let _: TeamPipelineUpdatePayload = decode("TeamPipelineUpdate", data)?;

    Ok(())
}

/// Revoke a grant
pub async fn delete_team_pipeline(gateway: &dyn RemoteGateway, id: &str) -> Result<()> {
    let input = TeamPipelineDeleteInput { id: id.to_string() };
    let request = GraphqlRequest::with_input("TeamPipelineDelete", DELETE_TEAM_PIPELINE, &input)?;
    gateway.mutate(request).await?;

    Ok(())
}
