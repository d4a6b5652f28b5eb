//! Configuration module
//!
//! Handles CLI configuration: remote connection settings and where the
//! resource state is persisted.

use anyhow::{Context, Result};
use kiteform_client::ClientConfig;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote connection settings
    pub client: ClientConfig,
    /// JSON file holding the resource state between invocations
    pub state_path: PathBuf,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.client
            .validate()
            .context("Invalid remote configuration")?;

        if self.state_path.as_os_str().is_empty() {
            anyhow::bail!("state path cannot be empty");
        }

        Ok(())
    }
}
