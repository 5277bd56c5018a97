//! String-keyed view data handed to the rendering layer.

use crate::model::owner::Owner;
use crate::model::pet::{Pet, PetType};
use std::collections::BTreeMap;

/// Key of the pet being created or edited.
pub const PET_KEY: &str = "pet";
/// Key of the pet-type catalogue offered by the form.
pub const TYPES_KEY: &str = "types";
/// Key of the owner the form belongs to.
pub const OWNER_KEY: &str = "owner";

/// Value stored in a `RenderContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValue {
    Pet(Pet),
    PetTypes(Vec<PetType>),
    Owner(Owner),
}

/// Mutable mapping written by the pet services and read by views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: BTreeMap<String, ModelValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the replaced value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: ModelValue) -> Option<ModelValue> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&ModelValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pet stored under `PET_KEY`.
    pub fn pet(&self) -> Option<&Pet> {
        match self.values.get(PET_KEY) {
            Some(ModelValue::Pet(pet)) => Some(pet),
            _ => None,
        }
    }

    /// Pet types stored under `TYPES_KEY`.
    pub fn pet_types(&self) -> Option<&[PetType]> {
        match self.values.get(TYPES_KEY) {
            Some(ModelValue::PetTypes(types)) => Some(types.as_slice()),
            _ => None,
        }
    }

    /// Owner stored under `OWNER_KEY`.
    pub fn owner(&self) -> Option<&Owner> {
        match self.values.get(OWNER_KEY) {
            Some(ModelValue::Owner(owner)) => Some(owner),
            _ => None,
        }
    }
}
