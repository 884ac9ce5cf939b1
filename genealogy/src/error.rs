//! Errors raised by registry mutations and snapshot handling.
//!
//! A lookup that finds nothing during traversal is not an error: the graph
//! accessor returns `None` and views render the gap as unknown.

use thiserror::Error;

use crate::components::{FamilyId, PersonId};

#[derive(Debug, Error)]
pub enum GenealogyError {
    #[error("family {0} not found")]
    FamilyNotFound(FamilyId),

    #[error("person {person} not found in family {family}")]
    PersonNotFound { family: FamilyId, person: PersonId },

    #[error("surname {0} not found")]
    SurnameNotFound(String),

    #[error("surname {0} already exists")]
    DuplicateSurname(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("deletion plan is stale: {0}")]
    StalePlan(String),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u8),

    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenealogyError>;
