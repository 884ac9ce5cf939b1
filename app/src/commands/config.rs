use crate::state::{AppState, ConfigView};

pub fn get_config(state: &AppState) -> ConfigView {
    let config = &state.config;
    ConfigView {
        model: config.narrative.model.clone(),
        base_url: config.narrative.base_url.clone(),
        has_api_key: state.narrator.is_some(),
        timeout_secs: config.narrative.timeout_secs,
        tree_max_depth: config.tree.max_depth,
        show_female: config.tree.show_female,
        log_level: config.log_level.clone(),
    }
}
