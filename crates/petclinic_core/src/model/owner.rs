//! Owner record and its pet collection.
//!
//! # Responsibility
//! - Hold an owner's contact fields and ordered pet collection.
//! - Provide pet lookup by id and by case-insensitive name.
//! - Validate owner fields before storage writes.
//!
//! # Invariants
//! - Pet insertion order is preserved.
//! - The collection itself does not reject duplicate names; the pet
//!   workflow does.

use crate::model::pet::{Pet, PetId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned owner identifier.
pub type OwnerId = i64;

static TELEPHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid telephone regex"));

/// Field-level validation failure for an owner record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerValidationError {
    /// Required text field is blank after trim.
    BlankField(&'static str),
    /// Telephone is not exactly 10 ASCII digits.
    InvalidTelephone(String),
}

impl Display for OwnerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "owner {field} must not be blank"),
            Self::InvalidTelephone(value) => {
                write!(f, "telephone must be a 10-digit number, got `{value}`")
            }
        }
    }
}

impl Error for OwnerValidationError {}

/// Pet owner with an exclusively owned, ordered pet collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// `None` until the owner store persists this owner.
    pub id: Option<OwnerId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    #[serde(default)]
    pets: Vec<Pet>,
}

impl Owner {
    /// Creates a transient owner without pets.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            city: city.into(),
            telephone: telephone.into(),
            pets: Vec::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Pets in insertion order.
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub(crate) fn pets_mut(&mut self) -> &mut [Pet] {
        &mut self.pets
    }

    /// Finds a member pet by id.
    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == Some(id))
    }

    pub fn pet_mut(&mut self, id: PetId) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.id == Some(id))
    }

    /// Finds the first member pet whose name equals `name` ignoring case.
    ///
    /// A member is skipped only when `exclude` is set and equals its id, so
    /// an unsaved pet never matches itself through exclusion. No whitespace
    /// trimming is applied.
    pub fn pet_by_name(&self, name: &str, exclude: Option<PetId>) -> Option<&Pet> {
        let needle = name.to_lowercase();
        self.pets.iter().find(|pet| {
            let excluded = exclude.is_some() && pet.id == exclude;
            !excluded && pet.name.to_lowercase() == needle
        })
    }

    /// Attaches a pet to this owner.
    ///
    /// - New pets are appended.
    /// - A persisted pet replaces the member with the same id in place, or is
    ///   appended when no member carries that id.
    pub fn add_pet(&mut self, pet: Pet) {
        if let Some(id) = pet.id {
            if let Some(slot) = self.pet_mut(id) {
                *slot = pet;
                return;
            }
        }
        self.pets.push(pet);
    }

    /// Validates owner contact fields.
    ///
    /// # Errors
    /// - `BlankField` for blank first/last name, address or city.
    /// - `InvalidTelephone` unless telephone is exactly 10 ASCII digits.
    pub fn validate(&self) -> Result<(), OwnerValidationError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(OwnerValidationError::BlankField(field));
            }
        }

        if !TELEPHONE_RE.is_match(&self.telephone) {
            return Err(OwnerValidationError::InvalidTelephone(
                self.telephone.clone(),
            ));
        }

        Ok(())
    }
}
