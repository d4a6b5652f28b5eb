//! Team access domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Access level a team holds on a pipeline
///
/// Raw strings are parsed into this enum at the configuration boundary and
/// formatted back only when written to the wire or to host state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    ReadOnly,
    BuildAndRead,
    ManageBuildAndRead,
}

impl AccessLevel {
    /// All accepted access levels, in increasing order of privilege
    pub const ALL: [AccessLevel; 3] = [
        AccessLevel::ReadOnly,
        AccessLevel::BuildAndRead,
        AccessLevel::ManageBuildAndRead,
    ];

    /// Wire representation of the access level
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::ReadOnly => "READ_ONLY",
            AccessLevel::BuildAndRead => "BUILD_AND_READ",
            AccessLevel::ManageBuildAndRead => "MANAGE_BUILD_AND_READ",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidAccessLevel(s.to_string()))
    }
}

/// A declared (not yet applied) team grant
///
/// Desired grants never carry a remote identifier; one is assigned by the
/// remote once the grant exists, see [`TeamGrant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub team_slug: String,
    pub access_level: AccessLevel,
}

impl AccessGrant {
    pub fn new(team_slug: impl Into<String>, access_level: AccessLevel) -> Self {
        Self {
            team_slug: team_slug.into(),
            access_level,
        }
    }
}

/// A grant that exists remotely, keyed by its own remote identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGrant {
    pub id: String,
    pub team_slug: String,
    pub access_level: AccessLevel,
}

impl TeamGrant {
    pub fn new(
        id: impl Into<String>,
        team_slug: impl Into<String>,
        access_level: AccessLevel,
    ) -> Self {
        Self {
            id: id.into(),
            team_slug: team_slug.into(),
            access_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_parse() {
        assert_eq!("READ_ONLY".parse(), Ok(AccessLevel::ReadOnly));
        assert_eq!("BUILD_AND_READ".parse(), Ok(AccessLevel::BuildAndRead));
        assert_eq!(
            "MANAGE_BUILD_AND_READ".parse(),
            Ok(AccessLevel::ManageBuildAndRead)
        );
    }

    #[test]
    fn test_access_level_rejects_unknown() {
        let result = "ADMIN".parse::<AccessLevel>();
        assert_eq!(
            result,
            Err(ConfigError::InvalidAccessLevel("ADMIN".to_string()))
        );

        // Matching is exact, not case-insensitive
        assert!("read_only".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn test_access_level_serde_matches_display() {
        for level in AccessLevel::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level));
        }
    }
}
