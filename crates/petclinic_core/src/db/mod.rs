//! Clinic database access.
//!
//! Connections handed out by [`open_db`] and [`open_db_in_memory`] are at
//! [`migrations::latest_version`] with the pet-type catalogue seeded, so the
//! owner repository can rely on `types`, `owners`, `pets` and `visits`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or upgrading the clinic database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite failure outside a schema step.
    Sqlite(rusqlite::Error),
    /// A schema step failed; the whole upgrade was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer clinic build.
    NewerSchema { found: u32, supported: u32 },
    /// A seed step left its table without rows.
    EmptySeed { version: u32, table: &'static str },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema step {version} ({name}) failed: {source}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "clinic database is at schema {found}; this build supports up to {supported}"
            ),
            Self::EmptySeed { version, table } => {
                write!(f, "schema step {version} left `{table}` empty")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::NewerSchema { .. } | Self::EmptySeed { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
