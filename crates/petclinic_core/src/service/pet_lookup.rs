//! Owner and pet resolution.
//!
//! # Responsibility
//! - Fetch an owner by id from the owner store.
//! - Resolve a pet inside that owner, or hand out a transient one.
//! - Publish the pet-type catalogue into a render context.
//!
//! # Invariants
//! - A transient pet is never a member of the owner's collection.
//! - No store writes happen here.

use crate::form::context::{ModelValue, RenderContext, TYPES_KEY};
use crate::model::owner::{Owner, OwnerId};
use crate::model::pet::{Pet, PetId};
use crate::repo::owner_repo::OwnerRepository;
use crate::service::PetServiceError;
use log::{debug, warn};

/// Read-side service over an owner store.
pub struct PetLookupService<R: OwnerRepository> {
    repo: R,
}

impl<R: OwnerRepository> PetLookupService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the owner with `owner_id`.
    ///
    /// # Errors
    /// - `OwnerNotFound` (message `Owner ID not found: {id}`) when the store
    ///   has no such owner.
    /// - `Repo` for store failures.
    pub fn find_owner(&self, owner_id: OwnerId) -> Result<Owner, PetServiceError> {
        match self.repo.find_by_id(owner_id)? {
            Some(owner) => Ok(owner),
            None => {
                warn!("event=owner_lookup module=service status=not_found owner_id={owner_id}");
                Err(PetServiceError::OwnerNotFound(owner_id))
            }
        }
    }

    /// Resolves a pet of `owner_id`.
    ///
    /// `pet_id == None` yields a fresh transient pet; otherwise the owner's
    /// stored pet with that id is returned.
    ///
    /// # Errors
    /// - `OwnerNotFound` when the owner does not exist.
    /// - `PetNotFound` when the owner has no pet with `pet_id`.
    pub fn find_pet(
        &self,
        owner_id: OwnerId,
        pet_id: Option<PetId>,
    ) -> Result<Pet, PetServiceError> {
        let owner = self.find_owner(owner_id)?;
        let Some(pet_id) = pet_id else {
            debug!("event=pet_lookup module=service status=ok owner_id={owner_id} pet_id=new");
            return Ok(Pet::new());
        };

        match owner.pet(pet_id) {
            Some(pet) => Ok(pet.clone()),
            None => {
                warn!(
                    "event=pet_lookup module=service status=not_found owner_id={owner_id} pet_id={pet_id}"
                );
                Err(PetServiceError::PetNotFound {
                    owner_id: Some(owner_id),
                    pet_id,
                })
            }
        }
    }

    /// Writes all known pet types into `context` under `TYPES_KEY`.
    pub fn populate_pet_types(&self, context: &mut RenderContext) -> Result<(), PetServiceError> {
        let types = self.repo.find_pet_types()?;
        context.insert(TYPES_KEY, ModelValue::PetTypes(types));
        Ok(())
    }
}
