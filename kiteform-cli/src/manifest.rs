//! Pipeline manifest loading
//!
//! A manifest is a TOML file declaring one pipeline:
//!
//! ```toml
//! name = "deploy"
//! repository = "git@github.com:acme/deploy.git"
//! default_branch = "main"
//! branch_configuration = "main release/*"
//! steps = """
//! steps:
//!   - command: make deploy
//! """
//!
//! [[team]]
//! slug = "eng"
//! access_level = "BUILD_AND_READ"
//! ```

use anyhow::{Context, Result};
use kiteform_provider::PipelineAttributes;
use std::path::Path;

/// Read and parse a manifest file
pub fn load(path: &Path) -> Result<PipelineAttributes> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Invalid manifest: {}", path.display()))
}

/// Parse manifest content
///
/// Computed attributes (`slug`, `webhook_url`) are ignored if present.
pub fn parse(content: &str) -> Result<PipelineAttributes> {
    let mut attributes: PipelineAttributes = toml::from_str(content)?;
    attributes.slug.clear();
    attributes.webhook_url.clear();

    Ok(attributes)
}
