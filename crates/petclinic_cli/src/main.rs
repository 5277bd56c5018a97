//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `petclinic_core` linkage, migrations and the type catalogue.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Environment:
//! - `PETCLINIC_DB_PATH`: database file; in-memory when unset.
//! - `PETCLINIC_LOG_DIR`: absolute log directory; logging off when unset.
//! - `PETCLINIC_LOG_LEVEL`: defaults to `default_log_level()`.

use petclinic_core::db::{open_db, open_db_in_memory};
use petclinic_core::{
    default_log_level, init_logging, PetLookupService, RenderContext, SqliteOwnerRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("event=cli_run module=cli status=error");
            eprintln!("petclinic_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    if let Ok(log_dir) = std::env::var("PETCLINIC_LOG_DIR") {
        let level = std::env::var("PETCLINIC_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    println!("petclinic_core ping={}", petclinic_core::ping());
    println!("petclinic_core version={}", petclinic_core::core_version());

    let conn = match std::env::var("PETCLINIC_DB_PATH") {
        Ok(path) => open_db(path),
        Err(_) => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let lookup = PetLookupService::new(SqliteOwnerRepository::new(&conn));
    let mut context = RenderContext::new();
    lookup
        .populate_pet_types(&mut context)
        .map_err(|err| err.to_string())?;

    let names: Vec<&str> = context
        .pet_types()
        .unwrap_or_default()
        .iter()
        .map(|pet_type| pet_type.name.as_str())
        .collect();
    println!("petclinic_core pet_types={}", names.join(","));
    Ok(())
}
