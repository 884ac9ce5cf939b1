//! Genealogy record engine
//!
//! Family books (族谱), the kinship graph over their members, ancestry tree
//! layout, the Five Degrees of Mourning chart and the narrative service
//! adapter.

pub mod components;
pub mod config;
pub mod error;
pub mod graph;
pub mod kinship;
pub mod migration;
pub mod narrative;
pub mod persistence;
pub mod registry;
pub mod seed;
pub mod tree;
pub mod walk;

pub use components::*;
pub use config::AppConfig;
pub use error::{GenealogyError, Result};
pub use graph::MemberPool;
pub use persistence::{ImportResult, SaveStats, Snapshot};
pub use registry::{DeletionPlan, DeletionTarget, NewFamily, Registry};
