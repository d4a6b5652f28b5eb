//! Organization DTOs

use serde::{Deserialize, Serialize};

/// Node carrying only an opaque identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdNode {
    pub id: String,
}

/// Response of the `organization(slug:)` lookup
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationLookup {
    pub organization: Option<IdNode>,
}
