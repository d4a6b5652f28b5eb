//! Pipeline domain types

use serde::{Deserialize, Serialize};

use super::team::{AccessGrant, TeamGrant};

/// Whether intermediate builds are skipped or cancelled, and on which branches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateBuildPolicy {
    pub enabled: bool,
    /// Branch filter expression; empty means every branch
    pub branch_filter: String,
}

impl IntermediateBuildPolicy {
    pub fn new(enabled: bool, branch_filter: impl Into<String>) -> Self {
        Self {
            enabled,
            branch_filter: branch_filter.into(),
        }
    }
}

/// Pipeline as held by the remote service
///
/// The identifier is assigned by the remote on creation and never changes.
/// `slug` and `webhook_url` are computed remotely and read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub default_branch: String,
    pub repository_url: String,
    pub cancel_intermediate_builds: IntermediateBuildPolicy,
    pub skip_intermediate_builds: IntermediateBuildPolicy,
    pub steps_yaml: String,
    pub webhook_url: String,
    pub slug: String,
    pub teams: Vec<TeamGrant>,
}

/// Declared pipeline configuration
///
/// Populated once per lifecycle invocation from validated attributes. Every
/// remote payload builder takes this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub name: String,
    pub description: String,
    pub default_branch: String,
    pub repository_url: String,
    pub cancel_intermediate_builds: IntermediateBuildPolicy,
    pub skip_intermediate_builds: IntermediateBuildPolicy,
    pub steps_yaml: String,
    /// Only settable through the REST fallback
    pub branch_configuration: Option<String>,
    pub teams: Vec<AccessGrant>,
}
