//! Pet create/update workflow.
//!
//! # Responsibility
//! - Prepare form state for creating or editing a pet.
//! - Enforce the owner-scoped, case-insensitive duplicate-name rule.
//! - Attach accepted pets to their owner and persist updates.
//!
//! # Invariants
//! - A rejected submission or a failed save leaves the owner unchanged.
//! - Creation attaches to the in-memory owner only; update saves the owner.
//! - Renaming a pet to its own current name is never a duplicate.

use crate::form::context::{ModelValue, RenderContext, OWNER_KEY, PET_KEY};
use crate::form::errors::{ValidationResult, DUPLICATE_CODE, NAME_FIELD};
use crate::model::owner::Owner;
use crate::model::pet::{Pet, PetId};
use crate::repo::owner_repo::OwnerRepository;
use crate::service::{id_label, PetServiceError};
use log::{debug, info, warn};
use std::fmt::{Display, Formatter};

/// View token for the shared create/update pet form.
pub const VIEW_PETS_CREATE_OR_UPDATE_FORM: &str = "pets/createOrUpdateForm";
/// Redirect token for the owner detail page.
pub const REDIRECT_OWNER_DETAILS: &str = "redirect:/owners/{ownerId}";

const DUPLICATE_MESSAGE: &str = "already exists";

/// Result of a workflow step, consumed by the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    /// Render (or re-render) the pet form.
    ShowForm,
    /// Submission accepted; go to the owner's page.
    RedirectToOwner,
}

impl FormOutcome {
    pub fn view_name(self) -> &'static str {
        match self {
            Self::ShowForm => VIEW_PETS_CREATE_OR_UPDATE_FORM,
            Self::RedirectToOwner => REDIRECT_OWNER_DETAILS,
        }
    }
}

impl Display for FormOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.view_name())
    }
}

/// Pet create/update use-cases over an owner store.
pub struct PetWorkflow<R: OwnerRepository> {
    repo: R,
}

impl<R: OwnerRepository> PetWorkflow<R> {
    /// Creates a workflow using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Places a transient pet and the owner into `context` for an empty
    /// creation form.
    pub fn init_creation_form(&self, owner: &Owner, context: &mut RenderContext) -> FormOutcome {
        context.insert(PET_KEY, ModelValue::Pet(Pet::new()));
        context.insert(OWNER_KEY, ModelValue::Owner(owner.clone()));
        debug!(
            "event=pet_create_form module=service status=ok owner_id={}",
            id_label(owner.id)
        );
        FormOutcome::ShowForm
    }

    /// Accepts or rejects a new pet for `owner`.
    ///
    /// # Contract
    /// - A case-insensitive name clash with any member pet adds a
    ///   `name`/`duplicate` error.
    /// - Any error in `result` (including upstream ones) re-shows the form
    ///   with the candidate under `PET_KEY`; the candidate stays unattached.
    /// - Otherwise the candidate is appended to the owner. No store call.
    pub fn process_creation_form(
        &self,
        owner: &mut Owner,
        pet: Pet,
        result: &mut ValidationResult,
        context: &mut RenderContext,
    ) -> FormOutcome {
        reject_duplicate_name(owner, &pet, None, result);

        if result.has_errors() {
            warn!(
                "event=pet_create module=service status=rejected owner_id={} error_count={}",
                id_label(owner.id),
                result.error_count()
            );
            context.insert(PET_KEY, ModelValue::Pet(pet));
            return FormOutcome::ShowForm;
        }

        owner.add_pet(pet);
        info!(
            "event=pet_create module=service status=ok owner_id={} pet_count={}",
            id_label(owner.id),
            owner.pets().len()
        );
        FormOutcome::RedirectToOwner
    }

    /// Places a copy of the owner's pet `pet_id`, and the owner, into
    /// `context` for editing.
    ///
    /// # Errors
    /// - `PetNotFound` when the owner has no such pet.
    pub fn init_update_form(
        &self,
        owner: &Owner,
        pet_id: PetId,
        context: &mut RenderContext,
    ) -> Result<FormOutcome, PetServiceError> {
        let pet = owner.pet(pet_id).ok_or(PetServiceError::PetNotFound {
            owner_id: owner.id,
            pet_id,
        })?;
        context.insert(PET_KEY, ModelValue::Pet(pet.clone()));
        context.insert(OWNER_KEY, ModelValue::Owner(owner.clone()));
        debug!(
            "event=pet_update_form module=service status=ok owner_id={} pet_id={pet_id}",
            id_label(owner.id)
        );
        Ok(FormOutcome::ShowForm)
    }

    /// Accepts or rejects an edited pet and saves the owner on success.
    ///
    /// # Contract
    /// - Duplicate-name check excludes the pet whose id equals `pet.id`.
    /// - On errors the form is re-shown and neither owner nor store change.
    /// - On success the pet is attached (new) or replaces its stored
    ///   counterpart (persisted), then the owner is saved.
    /// - A failed save restores the owner's pets as they were before the call.
    ///
    /// # Errors
    /// - `Repo` / `OwnerNotFound` when the store rejects the save.
    pub fn process_update_form(
        &self,
        pet: Pet,
        result: &mut ValidationResult,
        owner: &mut Owner,
        context: &mut RenderContext,
    ) -> Result<FormOutcome, PetServiceError> {
        reject_duplicate_name(owner, &pet, pet.id, result);

        if result.has_errors() {
            warn!(
                "event=pet_update module=service status=rejected owner_id={} pet_id={} error_count={}",
                id_label(owner.id),
                id_label(pet.id),
                result.error_count()
            );
            context.insert(PET_KEY, ModelValue::Pet(pet));
            return Ok(FormOutcome::ShowForm);
        }

        let pet_label = id_label(pet.id);
        let before_save = owner.clone();
        owner.add_pet(pet);
        if let Err(err) = self.repo.save(owner) {
            *owner = before_save;
            warn!(
                "event=pet_update module=service status=error owner_id={} pet_id={} error={}",
                id_label(owner.id),
                pet_label,
                err
            );
            return Err(err.into());
        }

        info!(
            "event=pet_update module=service status=ok owner_id={} pet_id={}",
            id_label(owner.id),
            pet_label
        );
        Ok(FormOutcome::RedirectToOwner)
    }
}

/// Adds a `name`/`duplicate` error on a clash; blank names are left to `PetValidator`.
fn reject_duplicate_name(
    owner: &Owner,
    pet: &Pet,
    exclude: Option<PetId>,
    result: &mut ValidationResult,
) {
    if pet.has_name() && owner.pet_by_name(&pet.name, exclude).is_some() {
        result.reject_value(NAME_FIELD, DUPLICATE_CODE, DUPLICATE_MESSAGE);
    }
}
