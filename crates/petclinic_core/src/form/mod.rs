//! Form-side state shared between callers and the pet workflow.
//!
//! # Responsibility
//! - Accumulate field errors in a caller-owned `ValidationResult`.
//! - Carry view data in a string-keyed `RenderContext`.
//! - Bind free-text pet input, including birth-date parsing.
//!
//! # Invariants
//! - Validation failures are recorded as field errors, never returned as
//!   `Err` values.

pub mod context;
pub mod date;
pub mod errors;
pub mod pet_form;
pub mod pet_validator;
