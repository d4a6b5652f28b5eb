//! Pipeline DTOs for the remote GraphQL protocol

use serde::{Deserialize, Serialize};

use super::team::TeamPipelineConnection;
use crate::domain::pipeline::{IntermediateBuildPolicy, PipelineRecord, PipelineSpec};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryNode {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepsNode {
    #[serde(default)]
    pub yaml: Option<String>,
}

/// Pipeline projection returned by `node(id:)` and by the pipeline mutations
///
/// Nullable remote fields are optional here and default to empty strings
/// once converted into a [`PipelineRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryNode>,
    #[serde(default)]
    pub cancel_intermediate_builds: bool,
    #[serde(default)]
    pub cancel_intermediate_builds_branch_filter: Option<String>,
    #[serde(default)]
    pub skip_intermediate_builds: bool,
    #[serde(default)]
    pub skip_intermediate_builds_branch_filter: Option<String>,
    #[serde(default)]
    pub steps: Option<StepsNode>,
    pub slug: String,
    #[serde(rename = "webhookURL", default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub teams: Option<TeamPipelineConnection>,
}

impl From<PipelineNode> for PipelineRecord {
    fn from(node: PipelineNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            description: node.description.unwrap_or_default(),
            default_branch: node.default_branch.unwrap_or_default(),
            repository_url: node.repository.map(|r| r.url).unwrap_or_default(),
            cancel_intermediate_builds: IntermediateBuildPolicy::new(
                node.cancel_intermediate_builds,
                node.cancel_intermediate_builds_branch_filter
                    .unwrap_or_default(),
            ),
            skip_intermediate_builds: IntermediateBuildPolicy::new(
                node.skip_intermediate_builds,
                node.skip_intermediate_builds_branch_filter
                    .unwrap_or_default(),
            ),
            steps_yaml: node.steps.and_then(|s| s.yaml).unwrap_or_default(),
            webhook_url: node.webhook_url.unwrap_or_default(),
            slug: node.slug,
            teams: node
                .teams
                .and_then(|c| c.edges)
                .unwrap_or_default()
                .into_iter()
                .map(|edge| edge.node.into())
                .collect(),
        }
    }
}

/// Response of the `node(id:)` query
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineQuery {
    pub node: Option<PipelineNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineMutationResult {
    pub pipeline: PipelineNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineCreatePayload {
    pub pipeline_create: PipelineMutationResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineUpdatePayload {
    pub pipeline_update: PipelineMutationResult,
}

/// Fields shared by create and update inputs
///
/// The remote requires every field on update, so both inputs always carry
/// the complete set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFields {
    pub name: String,
    pub description: String,
    pub default_branch: String,
    pub repository: RepositoryNode,
    pub steps: StepsInput,
    pub cancel_intermediate_builds: bool,
    pub cancel_intermediate_builds_branch_filter: String,
    pub skip_intermediate_builds: bool,
    pub skip_intermediate_builds_branch_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepsInput {
    pub yaml: String,
}

impl From<&PipelineSpec> for PipelineFields {
    fn from(spec: &PipelineSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            default_branch: spec.default_branch.clone(),
            repository: RepositoryNode {
                url: spec.repository_url.clone(),
            },
            steps: StepsInput {
                yaml: spec.steps_yaml.clone(),
            },
            cancel_intermediate_builds: spec.cancel_intermediate_builds.enabled,
            cancel_intermediate_builds_branch_filter: spec
                .cancel_intermediate_builds
                .branch_filter
                .clone(),
            skip_intermediate_builds: spec.skip_intermediate_builds.enabled,
            skip_intermediate_builds_branch_filter: spec
                .skip_intermediate_builds
                .branch_filter
                .clone(),
        }
    }
}

/// Input of `pipelineCreate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineCreateInput {
    pub organization_id: String,
    #[serde(flatten)]
    pub fields: PipelineFields,
}

impl PipelineCreateInput {
    pub fn new(organization_id: impl Into<String>, spec: &PipelineSpec) -> Self {
        Self {
            organization_id: organization_id.into(),
            fields: spec.into(),
        }
    }
}

/// Input of `pipelineUpdate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineUpdateInput {
    pub id: String,
    #[serde(flatten)]
    pub fields: PipelineFields,
}

impl PipelineUpdateInput {
    pub fn new(id: impl Into<String>, spec: &PipelineSpec) -> Self {
        Self {
            id: id.into(),
            fields: spec.into(),
        }
    }
}

/// Input of `pipelineDelete`
#[derive(Debug, Clone, Serialize)]
pub struct PipelineDeleteInput {
    pub id: String,
}

/// Body of the REST fallback `PATCH`
///
/// Carries configuration the GraphQL protocol cannot express yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineRestPatch {
    pub branch_configuration: String,
}
