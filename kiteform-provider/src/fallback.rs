//! REST fallback for settings the GraphQL API cannot express
//!
//! Issued after every pipeline create or update. The GraphQL API gains fields
//! over time, but whatever it still lacks keeps going through this path.
//! A failure here leaves the preceding GraphQL mutation in place.

use kiteform_client::{RemoteGateway, pipelines};
use kiteform_core::domain::pipeline::PipelineSpec;
use kiteform_core::dto::pipeline::PipelineRestPatch;
use tracing::{error, info};

use crate::error::{ProviderError, Result};

/// Builds the REST patch body for a declared pipeline
///
/// An undeclared branch configuration is sent as an empty string, which
/// clears it remotely.
pub fn rest_patch(spec: &PipelineSpec) -> PipelineRestPatch {
    PipelineRestPatch {
        branch_configuration: spec.branch_configuration.clone().unwrap_or_default(),
    }
}

/// Patches REST-only settings of the pipeline `slug`
pub async fn apply_rest_fallback(
    gateway: &dyn RemoteGateway,
    organization: &str,
    slug: &str,
    spec: &PipelineSpec,
) -> Result<()> {
    info!("Updating pipeline {} through the REST API", slug);

    pipelines::patch_pipeline(gateway, organization, slug, &rest_patch(spec))
        .await
        .map_err(|source| {
            error!("Unable to update pipeline {}: {}", slug, source);
            ProviderError::FallbackPatch {
                slug: slug.to_string(),
                source,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockGateway, PATCH};
    use kiteform_client::ClientError;
    use kiteform_core::domain::pipeline::IntermediateBuildPolicy;
    use serde_json::json;

    fn spec(branch_configuration: Option<&str>) -> PipelineSpec {
        PipelineSpec {
            name: "deploy".to_string(),
            description: String::new(),
            default_branch: "main".to_string(),
            repository_url: "git@github.com:acme/deploy.git".to_string(),
            cancel_intermediate_builds: IntermediateBuildPolicy::default(),
            skip_intermediate_builds: IntermediateBuildPolicy::default(),
            steps_yaml: "steps: []".to_string(),
            branch_configuration: branch_configuration.map(str::to_string),
            teams: vec![],
        }
    }

    #[tokio::test]
    async fn test_patches_branch_configuration() {
        let gateway = MockGateway::new();
        gateway.respond(PATCH, json!(null));

        apply_rest_fallback(&gateway, "acme", "deploy", &spec(Some("main release/*")))
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![Call::Patch {
                path: "organizations/acme/pipelines/deploy".to_string(),
                body: json!({ "branch_configuration": "main release/*" }),
            }]
        );
    }

    #[test]
    fn test_undeclared_branch_configuration_clears() {
        assert_eq!(rest_patch(&spec(None)).branch_configuration, "");
    }

    #[tokio::test]
    async fn test_failure_is_fallback_error() {
        let gateway = MockGateway::new();
        gateway.fail(PATCH, ClientError::api_error(403, "Forbidden"));

        let err = apply_rest_fallback(&gateway, "acme", "deploy", &spec(None))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::FallbackPatch { ref slug, .. } if slug == "deploy"));
    }
}
