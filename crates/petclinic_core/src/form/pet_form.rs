//! Free-text pet form binding.
//!
//! # Responsibility
//! - Turn raw form text into a `Pet` for the workflow.
//! - Resolve the type name against the known pet-type catalogue.
//! - Parse the birth date with `parse_birth_date`.
//!
//! # Invariants
//! - Binding never fails: unresolvable input becomes a `typeMismatch`
//!   field error and the field is left unset.

use crate::form::date::parse_birth_date;
use crate::form::errors::{ValidationResult, BIRTH_DATE_FIELD, TYPE_FIELD, TYPE_MISMATCH_CODE};
use crate::model::pet::{Pet, PetId, PetType};

/// Raw pet form input as submitted by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    /// Set when editing an existing pet.
    pub id: Option<PetId>,
    pub name: Option<String>,
    /// Pet type name, matched exactly against the catalogue.
    pub pet_type: Option<String>,
    /// `dd.MM.yyyy` text.
    pub birth_date: Option<String>,
}

impl PetForm {
    /// Binds this input into a pet, recording conversion failures.
    pub fn bind(&self, types: &[PetType], result: &mut ValidationResult) -> Pet {
        let mut pet = Pet {
            id: self.id,
            name: self.name.clone().unwrap_or_default(),
            ..Pet::new()
        };

        if let Some(type_name) = non_empty(self.pet_type.as_deref()) {
            match types.iter().find(|candidate| candidate.name == type_name) {
                Some(pet_type) => pet.pet_type = Some(pet_type.clone()),
                None => result.reject_value(
                    TYPE_FIELD,
                    TYPE_MISMATCH_CODE,
                    format!("type not found: {type_name}"),
                ),
            }
        }

        if let Some(text) = non_empty(self.birth_date.as_deref()) {
            match parse_birth_date(text) {
                Ok(date) => pet.birth_date = Some(date),
                Err(err) => {
                    result.reject_value(BIRTH_DATE_FIELD, TYPE_MISMATCH_CODE, err.to_string())
                }
            }
        }

        pet
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
