//! Team access reconciliation
//!
//! [`reconcile`] is a pure function: given the declared grants and the grants
//! the remote currently holds, it computes the operations that converge the
//! remote onto the declaration. It has no side effects, so running it twice
//! on the same inputs yields the same result.

use std::collections::{HashMap, HashSet};

use kiteform_core::domain::team::{AccessGrant, TeamGrant};

/// Operations needed to converge observed grants onto desired grants
///
/// Must be applied in field order: adds, then updates, then deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamChanges {
    /// Declared grants with no observed counterpart
    pub to_add: Vec<AccessGrant>,
    /// Observed grants whose level changes; carries the desired level and
    /// the observed grant identifier
    pub to_update: Vec<TeamGrant>,
    /// Observed grants with no declared counterpart
    pub to_delete: Vec<TeamGrant>,
}

impl TeamChanges {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of remote operations
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Computes the changes that turn `observed` into `desired`
///
/// Grants are matched by exact, case-sensitive team slug. If `desired`
/// declares a slug more than once, the last declaration wins and keeps its
/// position. `to_add` follows declaration order; `to_update` and
/// `to_delete` follow observed order.
pub fn reconcile(desired: &[AccessGrant], observed: &[TeamGrant]) -> TeamChanges {
    let by_slug: HashMap<&str, &AccessGrant> = desired
        .iter()
        .map(|grant| (grant.team_slug.as_str(), grant))
        .collect();

    let mut changes = TeamChanges::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for current in observed {
        seen.insert(current.team_slug.as_str());

        match by_slug.get(current.team_slug.as_str()) {
            None => changes.to_delete.push(current.clone()),
            Some(wanted) if wanted.access_level != current.access_level => {
                changes.to_update.push(TeamGrant {
                    id: current.id.clone(),
                    team_slug: current.team_slug.clone(),
                    access_level: wanted.access_level,
                });
            }
            Some(_) => {}
        }
    }

    for grant in desired {
        let slug = grant.team_slug.as_str();
        let is_last_declaration = by_slug
            .get(slug)
            .is_some_and(|winner| std::ptr::eq(*winner, grant));

        if is_last_declaration && !seen.contains(slug) {
            changes.to_add.push(grant.clone());
        }
    }

    changes
}
