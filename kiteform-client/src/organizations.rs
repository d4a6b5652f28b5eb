//! Organization endpoints

use kiteform_core::dto::organization::OrganizationLookup;
use serde_json::json;

use crate::RemoteGateway;
use crate::error::Result;
use crate::graphql::{GraphqlRequest, decode};

const ORGANIZATION_LOOKUP: &str = r#"query OrganizationLookup($slug: ID!) {
  organization(slug: $slug) { id }
}"#;

/// Look up an organization's opaque identifier by slug
///
/// # Returns
/// `None` when the token cannot see an organization with that slug
pub async fn get_organization_id(
    gateway: &dyn RemoteGateway,
    organization: &str,
) -> Result<Option<String>> {
    let request = GraphqlRequest::new(
        "OrganizationLookup",
        ORGANIZATION_LOOKUP,
        json!({ "slug": organization }),
    );
    let data = gateway.query(request).await?;
    let lookup: OrganizationLookup = decode("OrganizationLookup", data)?;

    Ok(lookup.organization.map(|org| org.id))
}
