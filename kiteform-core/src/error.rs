//! Configuration errors
//!
//! Raised while turning declared attributes into typed domain values,
//! always before any remote call is made.

use thiserror::Error;

/// Errors found while validating declared pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Access level outside the closed set accepted by the remote
    #[error(
        "access_level must be one of READ_ONLY, BUILD_AND_READ or MANAGE_BUILD_AND_READ, got: {0}"
    )]
    InvalidAccessLevel(String),

    /// A required attribute is empty
    #[error("attribute '{0}' is required")]
    MissingField(&'static str),

    /// The same team slug is declared more than once
    #[error("team '{0}' is declared more than once")]
    DuplicateTeam(String),
}
