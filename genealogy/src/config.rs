//! Application configuration
//!
//! Defaults, then an optional JSON file, then environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::narrative::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::tree::TreeOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl NarrativeConfig {
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Client settings, or `None` when no key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        if !self.has_key() {
            return None;
        }
        Some(GeminiConfig {
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub narrative: NarrativeConfig,
    pub tree: TreeOptions,
    /// One of error, warn, info, debug, trace.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            narrative: NarrativeConfig::default(),
            tree: TreeOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = set("GEMINI_API_KEY").or_else(|| set("API_KEY")) {
            self.narrative.api_key = Some(key);
        }
        if let Some(model) = set("GENEALOGY_MODEL") {
            self.narrative.model = model;
        }
        if let Some(url) = set("GENEALOGY_BASE_URL") {
            self.narrative.base_url = url;
        }
        if let Some(secs) = set("GENEALOGY_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.narrative.timeout_secs = Some(secs);
        }
        if let Some(level) = set("GENEALOGY_LOG") {
            self.log_level = level.trim().to_lowercase();
        }
    }
}
