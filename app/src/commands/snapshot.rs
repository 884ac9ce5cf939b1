use std::path::Path;

use genealogy::Registry;

use crate::state::{AppState, LoadResult, SaveResult};

pub fn save_snapshot(state: &AppState, file_path: &Path) -> Result<SaveResult, String> {
    let registry = state.registry()?;
    let stats = registry.save_to_file(file_path).map_err(|e| e.to_string())?;
    Ok(SaveResult {
        families: stats.families,
        members: stats.members,
        file_bytes: stats.bytes,
    })
}

/// Replace the whole registry with the snapshot at `file_path`.
pub fn load_snapshot(state: &AppState, file_path: &Path) -> Result<LoadResult, String> {
    let (loaded, result) = Registry::load_from_file(file_path).map_err(|e| e.to_string())?;
    *state.registry()? = loaded;
    Ok(LoadResult {
        families: result.families,
        members: result.members,
        surnames: result.surnames,
        regions: result.regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::families::{delete_family, list_families};
    use crate::commands::test_support::offline_state;

    #[test]
    fn test_save_then_load_restores_deleted_family() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        let state = offline_state();

        let saved = save_snapshot(&state, &path).unwrap();
        delete_family(&state, 3, true).unwrap();
        assert_eq!(list_families(&state).unwrap().len(), saved.families - 1);

        let loaded = load_snapshot(&state, &path).unwrap();
        assert_eq!(loaded.families, saved.families);
        assert_eq!(list_families(&state).unwrap().len(), saved.families);
    }

    #[test]
    fn test_bad_file_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let state = offline_state();

        assert!(load_snapshot(&state, &path).is_err());
        assert_eq!(list_families(&state).unwrap().len(), 10);
    }
}
