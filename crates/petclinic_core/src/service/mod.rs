//! Pet use-case services.
//!
//! # Responsibility
//! - Resolve owners and pets through the owner store.
//! - Drive pet create/update decisions above the repository layer.
//!
//! # Invariants
//! - Lookup misses surface as `PetServiceError`, never as panics.
//! - Field validation failures stay in `ValidationResult`.

use crate::model::owner::OwnerId;
use crate::model::pet::PetId;
use crate::repo::owner_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod pet_lookup;
pub mod pet_workflow;

/// Errors from pet lookup and workflow operations.
#[derive(Debug)]
pub enum PetServiceError {
    /// Owner store has no owner with this id.
    OwnerNotFound(OwnerId),
    /// Owner exists but holds no pet with this id.
    PetNotFound {
        owner_id: Option<OwnerId>,
        pet_id: PetId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PetServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OwnerNotFound(id) => write!(f, "Owner ID not found: {id}"),
            Self::PetNotFound { pet_id, .. } => write!(f, "Pet ID not found: {pet_id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PetServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PetServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(owner_id) => Self::OwnerNotFound(owner_id),
            other => Self::Repo(other),
        }
    }
}

/// Renders an optional id for log lines.
pub(crate) fn id_label(id: Option<i64>) -> String {
    id.map_or_else(|| "new".to_string(), |value| value.to_string())
}
