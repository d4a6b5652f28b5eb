//! Gateway configuration
//!
//! Connection settings for both remote protocols: the organization the
//! pipelines live in, the API token, and the two endpoint base URLs.

use std::time::Duration;

use crate::error::{ClientError, Result};

pub const DEFAULT_GRAPHQL_URL: &str = "https://graphql.buildkite.com/v1";
pub const DEFAULT_REST_URL: &str = "https://api.buildkite.com/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Organization slug (e.g., "acme")
    pub organization: String,

    /// API access token sent as a bearer token
    pub api_token: String,

    /// GraphQL endpoint
    pub graphql_url: String,

    /// REST API base URL
    pub rest_url: String,

    /// Per-request timeout, enforced by the transport
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with default endpoints
    pub fn new(organization: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            api_token: api_token.into(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BUILDKITE_ORGANIZATION (required)
    /// - BUILDKITE_API_TOKEN (required)
    /// - BUILDKITE_GRAPHQL_URL (optional)
    /// - BUILDKITE_REST_URL (optional)
    /// - BUILDKITE_TIMEOUT_SECS (optional, default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let organization = lookup("BUILDKITE_ORGANIZATION").ok_or_else(|| {
            ClientError::InvalidRequest(
                "BUILDKITE_ORGANIZATION environment variable not set".to_string(),
            )
        })?;

        let api_token = lookup("BUILDKITE_API_TOKEN").ok_or_else(|| {
            ClientError::InvalidRequest(
                "BUILDKITE_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let mut config = Self::new(organization, api_token);

        if let Some(url) = lookup("BUILDKITE_GRAPHQL_URL") {
            config.graphql_url = url;
        }

        if let Some(url) = lookup("BUILDKITE_REST_URL") {
            config.rest_url = url;
        }

        if let Some(secs) = lookup("BUILDKITE_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "BUILDKITE_TIMEOUT_SECS must be a whole number of seconds, got {secs:?}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Overrides both endpoint URLs
    pub fn with_endpoints(
        mut self,
        graphql_url: impl Into<String>,
        rest_url: impl Into<String>,
    ) -> Self {
        self.graphql_url = graphql_url.into();
        self.rest_url = rest_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "organization cannot be empty".to_string(),
            ));
        }

        if self.api_token.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "api_token cannot be empty".to_string(),
            ));
        }

        for (name, url) in [("graphql_url", &self.graphql_url), ("rest_url", &self.rest_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClientError::InvalidRequest(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ClientError::InvalidRequest(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
