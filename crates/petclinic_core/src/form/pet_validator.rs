//! Required-field checks for pet forms.
//!
//! Runs before the workflow; the workflow itself only adds the
//! duplicate-name rule on top of whatever this records.

use crate::form::errors::{
    ValidationResult, BIRTH_DATE_FIELD, NAME_FIELD, REQUIRED_CODE, TYPE_FIELD,
};
use crate::model::pet::Pet;

/// Validates required pet fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PetValidator;

impl PetValidator {
    pub fn new() -> Self {
        Self
    }

    /// Records one `required` error per missing field.
    ///
    /// - `name` must contain non-whitespace text.
    /// - `type` is required for new pets only.
    /// - `birthDate` must be set.
    pub fn validate(&self, pet: &Pet, result: &mut ValidationResult) {
        if !pet.has_name() {
            result.reject_value(NAME_FIELD, REQUIRED_CODE, REQUIRED_CODE);
        }

        if pet.is_new() && pet.pet_type.is_none() {
            result.reject_value(TYPE_FIELD, REQUIRED_CODE, REQUIRED_CODE);
        }

        if pet.birth_date.is_none() {
            result.reject_value(BIRTH_DATE_FIELD, REQUIRED_CODE, REQUIRED_CODE);
        }
    }
}
