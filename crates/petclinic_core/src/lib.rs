//! Core domain logic for the pet clinic.
//! Owns the pet create/update rules and the owner store contract.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use form::context::{ModelValue, RenderContext, OWNER_KEY, PET_KEY, TYPES_KEY};
pub use form::date::{format_birth_date, parse_birth_date, DateParseError, BIRTH_DATE_FORMAT};
pub use form::errors::{FieldError, ValidationResult};
pub use form::pet_form::PetForm;
pub use form::pet_validator::PetValidator;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::owner::{Owner, OwnerId, OwnerValidationError};
pub use model::pet::{Pet, PetId, PetType, PetTypeId, Visit, VisitId};
pub use repo::owner_repo::{OwnerRepository, RepoError, RepoResult, SqliteOwnerRepository};
pub use service::pet_lookup::PetLookupService;
pub use service::pet_workflow::{
    FormOutcome, PetWorkflow, REDIRECT_OWNER_DETAILS, VIEW_PETS_CREATE_OR_UPDATE_FORM,
};
pub use service::PetServiceError;

/// Minimal health-check API for smoke checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
