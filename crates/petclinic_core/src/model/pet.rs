//! Pet, pet type and visit records.
//!
//! # Responsibility
//! - Define the patient record attached to an owner.
//! - Provide small lifecycle helpers (`is_new`, `add_visit`).
//!
//! # Invariants
//! - `id == None` means the pet has never been persisted.
//! - Visits are append-only.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Storage-assigned pet identifier.
pub type PetId = i64;
/// Storage-assigned pet type identifier.
pub type PetTypeId = i64;
/// Storage-assigned visit identifier.
pub type VisitId = i64;

/// Classification value referenced by pets (dog, cat, ...).
///
/// The workflow only cares whether a pet has a type, not which one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: Option<PetTypeId>,
    pub name: String,
}

impl PetType {
    /// Creates an unsaved type reference by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(id: PetTypeId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

/// One recorded clinic visit for a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Option<VisitId>,
    pub date: NaiveDate,
    pub description: String,
}

impl Visit {
    /// Creates an unsaved visit dated today (local time).
    pub fn new(description: impl Into<String>) -> Self {
        Self::on(Local::now().date_naive(), description)
    }

    /// Creates an unsaved visit on an explicit date.
    pub fn on(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: None,
            date,
            description: description.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// Clinic patient record.
///
/// Required-ness of `name`, `birth_date` and `pet_type` is checked by
/// `PetValidator`, so a freshly bound pet may still have them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// `None` until the owner store persists this pet.
    pub id: Option<PetId>,
    /// Empty string means unset.
    pub name: String,
    /// Serialized as ISO `YYYY-MM-DD`.
    pub birth_date: Option<NaiveDate>,
    /// Serialized as `type` to match form field naming.
    #[serde(rename = "type")]
    pub pet_type: Option<PetType>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Pet {
    /// Creates a transient pet with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether this pet has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns whether `name` contains at least one non-whitespace character.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Appends a visit; existing visits are never reordered or replaced.
    pub fn add_visit(&mut self, visit: Visit) {
        self.visits.push(visit);
    }
}
