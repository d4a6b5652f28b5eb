//! Pipeline command handlers
//!
//! Each command loads the tracked resource state, runs one lifecycle
//! operation and writes the resulting state back.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use kiteform_client::{HttpGateway, RemoteGateway};
use kiteform_provider::{
    GraphqlIdentityResolver, PipelineController, ProviderError, ResourceState, TeamChanges,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::{manifest, state_file};

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Create the pipeline declared in a manifest
    Create {
        /// Path to the TOML manifest
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Refresh the tracked pipeline from the remote
    Read,
    /// Push a manifest to the tracked pipeline
    Update {
        /// Path to the TOML manifest
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Delete the tracked pipeline
    Delete,
    /// Start tracking an existing pipeline
    Import {
        /// Remote pipeline identifier
        id: String,
    },
    /// Show the team access changes an update would make
    Plan {
        /// Path to the TOML manifest
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

/// Handle pipeline commands
///
/// # Arguments
/// * `command` - The pipeline command to execute
/// * `config` - The CLI configuration
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let gateway: Arc<dyn RemoteGateway> = Arc::new(
        HttpGateway::new(&config.client).context("Failed to build the API client")?,
    );
    let resolver = Arc::new(GraphqlIdentityResolver::new(
        gateway.clone(),
        &config.client.organization,
    ));
    let controller = PipelineController::new(gateway, resolver, &config.client.organization);

    match command {
        PipelineCommands::Create { manifest } => {
            create_pipeline(&controller, config, &manifest).await
        }
        PipelineCommands::Read => read_pipeline(&controller, config).await,
        PipelineCommands::Update { manifest } => {
            update_pipeline(&controller, config, &manifest).await
        }
        PipelineCommands::Delete => delete_pipeline(&controller, config).await,
        PipelineCommands::Import { id } => import_pipeline(&controller, config, &id).await,
        PipelineCommands::Plan { manifest } => plan_pipeline(&controller, config, &manifest).await,
    }
}

/// Create the pipeline declared in a manifest
async fn create_pipeline(
    controller: &PipelineController,
    config: &Config,
    manifest_path: &Path,
) -> Result<()> {
    if let Some(ResourceState { id: Some(id), .. }) = state_file::load(&config.state_path)? {
        anyhow::bail!(
            "Pipeline {} is already tracked in {}",
            id,
            config.state_path.display()
        );
    }

    let attributes = manifest::load(manifest_path)?;
    let mut state = ResourceState::new(attributes);

    // A pipeline that was created but failed later must still be tracked
    let result = controller.create(&mut state).await;
    state_file::save(&config.state_path, &state)?;
    result.context("Failed to create pipeline")?;

    println!("{}", "✓ Pipeline created successfully!".green().bold());
    print_pipeline_details(&state);

    Ok(())
}

/// Refresh the tracked pipeline
async fn read_pipeline(controller: &PipelineController, config: &Config) -> Result<()> {
    let mut state = state_file::load_tracked(&config.state_path)?;

    controller
        .read(&mut state)
        .await
        .context("Failed to read pipeline")?;
    state_file::save(&config.state_path, &state)?;

    if state.id.is_none() {
        println!(
            "{}",
            "Pipeline no longer exists; it is no longer tracked.".yellow()
        );
    } else {
        print_pipeline_details(&state);
    }

    Ok(())
}

/// Push a manifest to the tracked pipeline
async fn update_pipeline(
    controller: &PipelineController,
    config: &Config,
    manifest_path: &Path,
) -> Result<()> {
    let mut state = state_file::load_tracked(&config.state_path)?;
    state.attributes = manifest::load(manifest_path)?;

    // Keep the previous state when the remote was never changed
    let result = controller.update(&mut state).await;
    if result.as_ref().err().is_none_or(changed_remote) {
        state_file::save(&config.state_path, &state)?;
    }
    result.context("Failed to update pipeline")?;

    println!("{}", "✓ Pipeline updated successfully!".green().bold());
    print_pipeline_details(&state);

    Ok(())
}

/// Whether an update that failed with `err` had already changed the remote
fn changed_remote(err: &ProviderError) -> bool {
    !matches!(
        err,
        ProviderError::Configuration(_)
            | ProviderError::MissingId
            | ProviderError::RemoteMutation {
                operation: "PipelineUpdate",
                ..
            }
    )
}

/// Delete the tracked pipeline
async fn delete_pipeline(controller: &PipelineController, config: &Config) -> Result<()> {
    let mut state = state_file::load_tracked(&config.state_path)?;
    let id = state.id.clone().unwrap_or_default();

    controller
        .delete(&mut state)
        .await
        .context("Failed to delete pipeline")?;
    state_file::save(&config.state_path, &state)?;

    println!(
        "{}",
        format!("✓ Pipeline {} deleted successfully!", id)
            .green()
            .bold()
    );

    Ok(())
}

/// Start tracking an existing pipeline
async fn import_pipeline(controller: &PipelineController, config: &Config, id: &str) -> Result<()> {
    if let Some(ResourceState {
        id: Some(existing), ..
    }) = state_file::load(&config.state_path)?
    {
        anyhow::bail!(
            "Pipeline {} is already tracked in {}",
            existing,
            config.state_path.display()
        );
    }

    let state = controller
        .import(id)
        .await
        .with_context(|| format!("Failed to import pipeline {}", id))?;
    state_file::save(&config.state_path, &state)?;

    println!("{}", "✓ Pipeline imported successfully!".green().bold());
    print_pipeline_details(&state);

    Ok(())
}

/// Show the team access changes a manifest would cause
async fn plan_pipeline(
    controller: &PipelineController,
    config: &Config,
    manifest_path: &Path,
) -> Result<()> {
    let mut state = state_file::load_tracked(&config.state_path)?;
    state.attributes = manifest::load(manifest_path)?;

    let changes = controller
        .plan(&state)
        .await
        .context("Failed to plan pipeline changes")?;

    print_team_changes(&changes);

    Ok(())
}

/// Print detailed pipeline information
fn print_pipeline_details(state: &ResourceState) {
    let attributes = &state.attributes;

    println!("{}", "Pipeline Details:".bold());
    if let Some(id) = &state.id {
        println!("  ID:          {}", id.cyan());
    }
    println!("  Name:        {}", attributes.name.bold());
    println!("  Slug:        {}", attributes.slug);
    if !attributes.description.is_empty() {
        println!("  Description: {}", attributes.description);
    }
    println!("  Repository:  {}", attributes.repository);
    if !attributes.default_branch.is_empty() {
        println!("  Branch:      {}", attributes.default_branch);
    }
    if !attributes.webhook_url.is_empty() {
        println!("  Webhook:     {}", attributes.webhook_url.dimmed());
    }

    if !attributes.teams.is_empty() {
        println!("  Teams:");
        for team in &attributes.teams {
            println!(
                "    - {}: {}",
                team.slug.cyan(),
                team.access_level.dimmed()
            );
        }
    }
}

/// Print a team diff as +/~/- lines
fn print_team_changes(changes: &TeamChanges) {
    if changes.is_empty() {
        println!("{}", "No team access changes.".yellow());
        return;
    }

    println!(
        "{}",
        format!("{} team access change(s):", changes.len()).bold()
    );
    for grant in &changes.to_add {
        println!(
            "  {} {} {}",
            "+".green(),
            grant.team_slug.cyan(),
            grant.access_level.to_string().dimmed()
        );
    }
    for grant in &changes.to_update {
        println!(
            "  {} {} {}",
            "~".yellow(),
            grant.team_slug.cyan(),
            grant.access_level.to_string().dimmed()
        );
    }
    for grant in &changes.to_delete {
        println!("  {} {}", "-".red(), grant.team_slug.cyan());
    }
}
