//! Kiteform CLI
//!
//! Command-line host for managing CI pipelines as code: reads a declared
//! pipeline from a TOML manifest, persists the resource state to a JSON file
//! and drives the pipeline lifecycle against the remote service.

mod commands;
mod config;
mod manifest;
mod state_file;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use kiteform_client::ClientConfig;
use kiteform_client::config::{DEFAULT_GRAPHQL_URL, DEFAULT_REST_URL};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kiteform")]
#[command(about = "Manage CI pipelines and their team access as code", long_about = None)]
struct Cli {
    /// Organization slug
    #[arg(long, env = "BUILDKITE_ORGANIZATION")]
    organization: String,

    /// API access token
    #[arg(long, env = "BUILDKITE_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// GraphQL endpoint
    #[arg(long, env = "BUILDKITE_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    graphql_url: String,

    /// REST API base URL
    #[arg(long, env = "BUILDKITE_REST_URL", default_value = DEFAULT_REST_URL)]
    rest_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "BUILDKITE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Path of the resource state file
    #[arg(long, default_value = "kiteform.state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kiteform=info,kiteform_provider=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut client = ClientConfig::new(cli.organization, cli.api_token)
        .with_endpoints(cli.graphql_url, cli.rest_url);
    client.timeout = Duration::from_secs(cli.timeout_secs);

    let config = Config {
        client,
        state_path: cli.state,
    };
    config.validate()?;
    tracing::debug!("Using state file {}", config.state_path.display());

    handle_command(cli.command, &config).await
}
