//! Schema history of the clinic database.
//!
//! Pending steps run in one upgrade transaction; each bumps `user_version`
//! to its own number. A step that seeds a table must leave rows in it, or the
//! upgrade is rolled back with `EmptySeed`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
    seeds: Option<&'static str>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
        seeds: None,
    },
    Migration {
        version: 2,
        name: "seed_pet_types",
        sql: include_str!("0002_seed_pet_types.sql"),
        seeds: Some("types"),
    },
];

impl Migration {
    fn run(&self, tx: &Transaction<'_>) -> DbResult<()> {
        let failed = |source: rusqlite::Error| DbError::Migration {
            version: self.version,
            name: self.name,
            source,
        };

        tx.execute_batch(self.sql).map_err(failed)?;
        if let Some(table) = self.seeds {
            let rows: i64 = tx
                .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                    row.get(0)
                })
                .map_err(failed)?;
            if rows == 0 {
                return Err(DbError::EmptySeed {
                    version: self.version,
                    table,
                });
            }
        }
        tx.pragma_update(None, "user_version", self.version)
            .map_err(failed)
    }
}

/// Schema version a fully upgraded clinic database reports.
pub fn latest_version() -> u32 {
    last_version(MIGRATIONS)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `NewerSchema` when the file is ahead of this build; nothing runs.
/// - `Migration` naming the failing step.
/// - `EmptySeed` when the pet-type catalogue ends up empty.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    upgrade(conn, MIGRATIONS)
}

fn last_version(steps: &[Migration]) -> u32 {
    steps.iter().map(|step| step.version).max().unwrap_or(0)
}

fn upgrade(conn: &mut Connection, steps: &[Migration]) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = last_version(steps);
    if found > supported {
        return Err(DbError::NewerSchema { found, supported });
    }

    let mut pending = steps.iter().filter(|step| step.version > found).peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        step.run(&tx)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}
