//! Persistence module for export/import of the registry
//!
//! Serializes every family book plus reference data to versioned JSON and
//! restores it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::components::*;
use crate::error::{GenealogyError, Result};
use crate::registry::Registry;

pub const SNAPSHOT_VERSION: u8 = 1;

// ============================================================================
// Export Data Structures
// ============================================================================

/// Complete registry state for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u8,
    pub families: Vec<Family>,
    #[serde(default)]
    pub surnames: Vec<SurnameData>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub next_person_id: u64,
    #[serde(default)]
    pub next_family_id: u64,
    #[serde(default)]
    pub next_region_id: u64,
}

/// Result of import operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub families: usize,
    pub members: usize,
    pub surnames: usize,
    pub regions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveStats {
    pub families: usize,
    pub members: usize,
    pub bytes: usize,
}

// ============================================================================
// Export / Import
// ============================================================================

impl Registry {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            families: self.families.clone(),
            surnames: self.surnames.clone(),
            regions: self.regions.clone(),
            next_person_id: self.next_person_id,
            next_family_id: self.next_family_id,
            next_region_id: self.next_region_id,
        }
    }

    /// Export the whole registry to a JSON string.
    pub fn export_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Import registry state from JSON, replacing the current state.
    ///
    /// The current state is untouched when the snapshot is rejected.
    pub fn import_snapshot(&mut self, json: &str) -> Result<ImportResult> {
        let data: Snapshot = serde_json::from_str(json)?;
        if data.version != SNAPSHOT_VERSION {
            return Err(GenealogyError::UnsupportedVersion(data.version));
        }

        let mut family_ids = HashSet::new();
        let mut person_ids = HashSet::new();
        for family in &data.families {
            if !family_ids.insert(family.id) {
                return Err(GenealogyError::InvalidRecord(format!(
                    "duplicate family id {}",
                    family.id
                )));
            }
            for member in &family.members {
                if !person_ids.insert(member.id) {
                    return Err(GenealogyError::InvalidRecord(format!(
                        "duplicate person id {}",
                        member.id
                    )));
                }
            }
        }

        // counters never fall behind the ids already in use
        let max_person = person_ids.iter().map(|id| id.0).max().unwrap_or(0);
        let max_family = family_ids.iter().map(|id| id.0).max().unwrap_or(0);
        let max_region = data.regions.iter().map(|r| r.id.0).max().unwrap_or(0);

        let next_person_id = next_counter("person", data.next_person_id, max_person)?;
        let next_family_id = next_counter("family", data.next_family_id, max_family)?;
        let next_region_id = next_counter("region", data.next_region_id, max_region)?;

        self.families = data.families;
        self.surnames = data.surnames;
        self.regions = data.regions;
        self.next_person_id = next_person_id;
        self.next_family_id = next_family_id;
        self.next_region_id = next_region_id;
        self.reindex();

        let result = ImportResult {
            families: self.families.len(),
            members: self.member_count(),
            surnames: self.surnames.len(),
            regions: self.regions.len(),
        };
        info!(
            "Imported snapshot: {} families, {} members",
            result.families, result.members
        );
        Ok(result)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<SaveStats> {
        let json = self.export_snapshot()?;
        fs::write(path.as_ref(), &json)?;
        info!("Saved registry to {}", path.as_ref().display());
        Ok(SaveStats {
            families: self.families.len(),
            members: self.member_count(),
            bytes: json.len(),
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<(Registry, ImportResult)> {
        let json = fs::read_to_string(path.as_ref())?;
        let mut registry = Registry::new();
        let result = registry.import_snapshot(&json)?;
        Ok((registry, result))
    }
}

/// Next free id for a counter: past every stored id, and never at the top
/// of the range, where the following allocation would overflow.
fn next_counter(kind: &str, stored: u64, max_in_use: u64) -> Result<u64> {
    max_in_use
        .checked_add(1)
        .map(|n| n.max(stored))
        .filter(|n| *n < u64::MAX)
        .ok_or_else(|| GenealogyError::InvalidRecord(format!("{} id {} is out of range", kind, max_in_use)))
}
