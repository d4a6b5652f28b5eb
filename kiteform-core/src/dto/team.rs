//! Team and team-pipeline DTOs

use serde::{Deserialize, Serialize};

use super::organization::IdNode;
use crate::domain::team::{AccessLevel, TeamGrant};

/// Team reference embedded in a team-pipeline edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNode {
    pub slug: String,
}

/// A team's grant on a pipeline, as returned by the remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPipelineNode {
    pub id: String,
    pub access_level: AccessLevel,
    pub team: TeamNode,
}

impl From<TeamPipelineNode> for TeamGrant {
    fn from(node: TeamPipelineNode) -> Self {
        Self {
            id: node.id,
            team_slug: node.team.slug,
            access_level: node.access_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPipelineEdge {
    pub node: TeamPipelineNode,
}

/// `teams(first: 50)` connection on a pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPipelineConnection {
    #[serde(default)]
    pub edges: Option<Vec<TeamPipelineEdge>>,
}

/// Response of the `team(slug:)` lookup
#[derive(Debug, Clone, Deserialize)]
pub struct TeamLookup {
    pub team: Option<IdNode>,
}

/// Input of `teamPipelineCreate`
#[derive(Debug, Clone, Serialize)]
pub struct TeamPipelineCreateInput {
    #[serde(rename = "teamID")]
    pub team_id: String,
    #[serde(rename = "pipelineID")]
    pub pipeline_id: String,
    #[serde(rename = "accessLevel")]
    pub access_level: AccessLevel,
}

/// Input of `teamPipelineUpdate`, keyed by the grant's own identifier
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPipelineUpdateInput {
    pub id: String,
    pub access_level: AccessLevel,
}

/// Input of `teamPipelineDelete`
#[derive(Debug, Clone, Serialize)]
pub struct TeamPipelineDeleteInput {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPipelineCreatePayload {
    pub team_pipeline_create: TeamPipelineMutationResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPipelineUpdatePayload {
    pub team_pipeline_update: TeamPipelineMutationResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPipelineMutationResult {
    pub team_pipeline: IdNode,
}
