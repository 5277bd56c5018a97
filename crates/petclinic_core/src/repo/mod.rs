//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the owner store contract consumed by pet services.
//! - Isolate SQLite query details from workflow orchestration.
//!
//! # Invariants
//! - Writes must enforce `Owner::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod owner_repo;
