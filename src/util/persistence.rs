use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "dz";
const APP_ORG: &str = "KitabMarket";
const APP_NAME: &str = "KitabMarket";

/// Only the sell draft survives restarts, so the whole file is cheap to rewrite.
fn draft_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("draft.json"))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    let path = draft_file()?;
    read_state(&path)
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = draft_file().ok_or(PersistSaveError::StorageUnavailable)?;
    write_state(&path, state)
}

fn read_state(path: &Path) -> Option<PersistedState> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(err) => {
            println!(
                "[persist] Ignoring unreadable state at {}: {err}",
                path.display()
            );
            None
        }
    }
}

fn write_state(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    // Write-then-rename so a crash mid-save cannot truncate the draft.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kitab-market-{name}-{}", std::process::id()))
    }

    #[test]
    fn drafts_round_trip_through_disk() {
        let dir = temp_dir("round-trip");
        let path = dir.join("draft.json");
        let mut state = PersistedState::default();
        state.draft.title = "Nedjma".to_string();

        write_state(&path, &state).unwrap();
        let loaded = read_state(&path).unwrap();
        assert_eq!(loaded.draft.title, "Nedjma");
        assert!(!path.with_extension("json.tmp").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_files_load_as_none() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("draft.json");
        fs::write(&path, "{not json").unwrap();

        assert!(read_state(&path).is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_files_load_as_none() {
        assert!(read_state(Path::new("/nonexistent/kitab/draft.json")).is_none());
    }
}
