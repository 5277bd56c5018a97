//! Clinic domain model for owners and their pets.
//!
//! # Responsibility
//! - Define the records shared by lookup, workflow and storage layers.
//! - Keep owner/pet composition in one place.
//!
//! # Invariants
//! - A pet is "new" until storage assigns its id.
//! - An owner exclusively owns its pets; pet types are shared by value.

pub mod owner;
pub mod pet;
