pub mod config;
pub mod families;
pub mod kinship;
pub mod people;
pub mod snapshot;
pub mod surnames;
pub mod tree;

use genealogy::Registry;
use tracing::debug;

use crate::state::AppState;

/// Write the registry back to the data file, if one is configured.
pub(crate) fn persist(state: &AppState, registry: &Registry) -> Result<(), String> {
    if let Some(path) = &state.data_path {
        let stats = registry.save_to_file(path).map_err(|e| e.to_string())?;
        debug!("Persisted {} families ({} bytes)", stats.families, stats.bytes);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use genealogy::config::AppConfig;
    use genealogy::seed::default_registry;
    use std::sync::{Arc, Mutex};

    use crate::state::AppState;

    pub fn offline_state() -> AppState {
        AppState {
            registry: Arc::new(Mutex::new(default_registry())),
            narrator: None,
            config: AppConfig::default(),
            data_path: None,
        }
    }
}
