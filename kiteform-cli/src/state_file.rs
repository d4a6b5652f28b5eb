//! Resource state persistence
//!
//! The CLI plays the host's role of persisting resource state between
//! invocations. State is a pretty-printed JSON [`ResourceState`].

use anyhow::{Context, Result};
use kiteform_provider::ResourceState;
use std::path::Path;

/// Load state, returning `None` if the file does not exist
pub fn load(path: &Path) -> Result<Option<ResourceState>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    let state = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

    Ok(Some(state))
}

/// Load state that must exist and carry a remote identifier
pub fn load_tracked(path: &Path) -> Result<ResourceState> {
    match load(path)? {
        Some(state) if state.id.is_some() => Ok(state),
        _ => anyhow::bail!(
            "No pipeline is tracked in {}; run `create` or `import` first",
            path.display()
        ),
    }
}

/// Save state, or remove the file once the resource is gone
pub fn save(path: &Path, state: &ResourceState) -> Result<()> {
    if state.id.is_none() {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove state file: {}", path.display()))?;
        }
        return Ok(());
    }

    let content = serde_json::to_string_pretty(state).context("Failed to encode state")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write state file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        assert!(load(&path).unwrap().is_none());
        assert!(load_tracked(&path).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = ResourceState::from_id("P-1");
        state.attributes.name = "deploy".to_string();
        save(&path, &state).unwrap();

        assert_eq!(load_tracked(&path).unwrap(), state);
    }

    #[test]
    fn test_untracked_state_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        save(&path, &ResourceState::from_id("P-1")).unwrap();
        assert!(path.exists());

        save(&path, &ResourceState::default()).unwrap();
        assert!(!path.exists());
    }
}
