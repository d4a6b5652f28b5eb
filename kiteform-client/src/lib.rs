//! Kiteform Client
//!
//! A thin, transport-agnostic gateway to the remote CI service.
//!
//! The remote exposes two protocols: a GraphQL API used for almost
//! everything, and a REST API that still covers a few pipeline settings the
//! GraphQL API cannot express. [`RemoteGateway`] abstracts both so the
//! provider can be driven by the real HTTP transport ([`HttpGateway`]) or by
//! an in-memory double in tests.
//!
//! Typed endpoint functions are grouped per resource in [`pipelines`],
//! [`teams`] and [`organizations`].
//!
//! # Example
//!
//! ```no_run
//! use kiteform_client::{ClientConfig, HttpGateway, pipelines};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let gateway = HttpGateway::new(&config)?;
//!
//!     if let Some(pipeline) = pipelines::get_pipeline(&gateway, "UGlwZWxpbmUtLS0x").await? {
//!         println!("Found pipeline: {}", pipeline.slug);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod graphql;
pub mod organizations;
pub mod pipelines;
pub mod teams;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use graphql::GraphqlRequest;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::graphql::GraphqlResponse;

/// Gateway to the remote service's two protocols
///
/// Implementations issue exactly one remote call per method invocation and
/// never retry.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Run a read-only GraphQL operation and return its `data`
    async fn query(&self, request: GraphqlRequest) -> Result<Value>;

    /// Run a GraphQL mutation and return its `data`
    async fn mutate(&self, request: GraphqlRequest) -> Result<Value>;

    /// `PATCH` a REST resource, `path` being relative to the REST base URL
    ///
    /// Succeeds only on HTTP 200.
    async fn patch(&self, path: &str, body: Value) -> Result<()>;
}

/// HTTP implementation of [`RemoteGateway`]
#[derive(Debug, Clone)]
pub struct HttpGateway {
    /// GraphQL endpoint (e.g., "https://graphql.buildkite.com/v1")
    graphql_url: String,
    /// REST base URL (e.g., "https://api.buildkite.com/v2")
    rest_url: String,
    /// HTTP client instance, carrying the bearer token
    client: Client,
}

impl HttpGateway {
    /// Create a gateway from configuration
    ///
    /// Builds a reqwest client that sends the API token on every request and
    /// enforces the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut token = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|e| ClientError::InvalidRequest(format!("invalid API token: {e}")))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("kiteform/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(
            config.graphql_url.clone(),
            config.rest_url.clone(),
            client,
        ))
    }

    /// Create a gateway with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The caller is
    /// responsible for authentication headers.
    pub fn with_client(
        graphql_url: impl Into<String>,
        rest_url: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            graphql_url: graphql_url.into().trim_end_matches('/').to_string(),
            rest_url: rest_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the GraphQL endpoint
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Get the REST base URL
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        debug!("GraphQL {}", request.operation_name);

        let response = self
            .client
            .post(&self.graphql_url)
            .json(&request)
            .send()
            .await?;

        let envelope: GraphqlResponse = self.handle_response(response).await?;
        envelope.into_data()
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn query(&self, request: GraphqlRequest) -> Result<Value> {
        self.execute(request).await
    }

    async fn mutate(&self, request: GraphqlRequest) -> Result<Value> {
        self.execute(request).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<()> {
        let url = format!("{}/{}", self.rest_url, path.trim_start_matches('/'));
        debug!("PATCH {}", url);

        let response = self.client.patch(&url).json(&body).send().await?;
        let status = response.status();

        // Only a plain 200 counts, not any 2xx
        if status != reqwest::StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_for(server: &MockServer) -> HttpGateway {
        let config = ClientConfig::new("acme", "secret-token").with_endpoints(
            format!("{}/graphql", server.uri()),
            format!("{}/v2/", server.uri()),
        );
        HttpGateway::new(&config).unwrap()
    }

    fn request() -> GraphqlRequest {
        GraphqlRequest::new(
            "OrganizationLookup",
            "query OrganizationLookup($slug: ID!) { organization(slug: $slug) { id } }",
            json!({ "slug": "acme" }),
        )
    }

    #[test]
    fn test_gateway_trims_trailing_slash() {
        let gateway = HttpGateway::with_client(
            "http://localhost:8080/graphql/",
            "http://localhost:8080/v2/",
            Client::new(),
        );
        assert_eq!(gateway.graphql_url(), "http://localhost:8080/graphql");
        assert_eq!(gateway.rest_url(), "http://localhost:8080/v2");
    }

    #[tokio::test]
    async fn test_query_sends_token_and_operation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_partial_json(json!({
                "operationName": "OrganizationLookup",
                "variables": { "slug": "acme" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "organization": { "id": "org-1" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let data = gateway.query(request()).await.unwrap();
        assert_eq!(data["organization"]["id"], "org-1");
    }

    #[tokio::test]
    async fn test_graphql_errors_on_http_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Name has already been taken" }]
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.mutate(request()).await.unwrap_err();
        assert!(matches!(err, ClientError::GraphqlErrors(_)));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.query(request()).await.unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_patch_success() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v2/organizations/acme/pipelines/deploy"))
            .and(body_json(json!({ "branch_configuration": "main release/*" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "slug": "deploy" })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        gateway
            .patch(
                "organizations/acme/pipelines/deploy",
                json!({ "branch_configuration": "main release/*" }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_patch_requires_exactly_200() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway
            .patch("organizations/acme/pipelines/deploy", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 202, .. }));
    }
}
