//! Host-facing resource state
//!
//! [`PipelineAttributes`] is the attribute surface the host reads and
//! writes: plain strings and booleans, access levels included. It is turned
//! into a typed [`PipelineSpec`] once per lifecycle invocation and refreshed
//! from a [`PipelineRecord`] after every remote read.

use std::collections::HashSet;

use kiteform_core::ConfigError;
use kiteform_core::domain::pipeline::{IntermediateBuildPolicy, PipelineRecord, PipelineSpec};
use kiteform_core::domain::team::{AccessGrant, AccessLevel};
use serde::{Deserialize, Serialize};

/// A team grant as declared by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAttribute {
    pub slug: String,
    pub access_level: String,
}

impl TeamAttribute {
    pub fn new(slug: impl Into<String>, access_level: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            access_level: access_level.into(),
        }
    }
}

/// Pipeline attributes as the host stores them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineAttributes {
    pub name: String,
    pub repository: String,
    pub steps: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub cancel_intermediate_builds: bool,
    #[serde(default)]
    pub cancel_intermediate_builds_branch_filter: String,
    #[serde(default)]
    pub skip_intermediate_builds: bool,
    #[serde(default)]
    pub skip_intermediate_builds_branch_filter: String,
    /// REST-only; never returned by reads, so kept as declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_configuration: Option<String>,
    /// Computed by the remote
    #[serde(default)]
    pub slug: String,
    /// Computed by the remote
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default, rename = "team")]
    pub teams: Vec<TeamAttribute>,
}

impl PipelineAttributes {
    /// Validates the attributes and converts them into a [`PipelineSpec`]
    ///
    /// # Errors
    /// - [`ConfigError::MissingField`] for an empty name, repository or steps
    /// - [`ConfigError::InvalidAccessLevel`] for an unknown access level
    /// - [`ConfigError::DuplicateTeam`] when a team slug is declared twice
    pub fn to_spec(&self) -> Result<PipelineSpec, ConfigError> {
        for (field, value) in [
            ("name", &self.name),
            ("repository", &self.repository),
            ("steps", &self.steps),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }

        let mut seen = HashSet::new();
        let mut teams = Vec::with_capacity(self.teams.len());
        for team in &self.teams {
            if !seen.insert(team.slug.as_str()) {
                return Err(ConfigError::DuplicateTeam(team.slug.clone()));
            }
            let access_level: AccessLevel = team.access_level.parse()?;
            teams.push(AccessGrant::new(&team.slug, access_level));
        }

        Ok(PipelineSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            default_branch: self.default_branch.clone(),
            repository_url: self.repository.clone(),
            cancel_intermediate_builds: IntermediateBuildPolicy::new(
                self.cancel_intermediate_builds,
                &self.cancel_intermediate_builds_branch_filter,
            ),
            skip_intermediate_builds: IntermediateBuildPolicy::new(
                self.skip_intermediate_builds,
                &self.skip_intermediate_builds_branch_filter,
            ),
            steps_yaml: self.steps.clone(),
            branch_configuration: self.branch_configuration.clone(),
            teams,
        })
    }

    /// Overwrites every remote-backed attribute with `record`
    ///
    /// Grants are written back in the declared shape so the host can diff
    /// them against a future declaration.
    pub fn apply_record(&mut self, record: &PipelineRecord) {
        self.name = record.name.clone();
        self.description = record.description.clone();
        self.default_branch = record.default_branch.clone();
        self.repository = record.repository_url.clone();
        self.steps = record.steps_yaml.clone();
        self.cancel_intermediate_builds = record.cancel_intermediate_builds.enabled;
        self.cancel_intermediate_builds_branch_filter =
            record.cancel_intermediate_builds.branch_filter.clone();
        self.skip_intermediate_builds = record.skip_intermediate_builds.enabled;
        self.skip_intermediate_builds_branch_filter =
            record.skip_intermediate_builds.branch_filter.clone();
        self.slug = record.slug.clone();
        self.webhook_url = record.webhook_url.clone();
        self.teams = record
            .teams
            .iter()
            .map(|grant| TeamAttribute::new(&grant.team_slug, grant.access_level.as_str()))
            .collect();
    }
}

/// A pipeline resource as the host persists it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Remote identifier; `None` until created or imported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub attributes: PipelineAttributes,
}

impl ResourceState {
    pub fn new(attributes: PipelineAttributes) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// State that only knows its remote identifier, as after an import
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: PipelineAttributes::default(),
        }
    }
}
