// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and checking the shift accounting database.
//!
//! Scheduled jobs and interactive edits may hit the same file, so file
//! databases run in WAL mode and wait on a busy writer instead of failing
//! at once. The one-valid-attendance-per-slot rule lives in a partial index
//! that is checked after every migration run.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits for a concurrent writer.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Indexes the accounting rules depend on.
const REQUIRED_INDEXES: [&str; 1] = ["idx_shift_attendances_one_valid_per_slot"];

/// Where a database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// A shared-cache in-memory database, private to one adapter.
    Memory,
    /// A database file shared with other processes.
    File,
}

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct IndexNameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Returns the row ID assigned by the last insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}

/// Verifies that every index the accounting rules rely on exists.
///
/// # Errors
///
/// Returns an error naming the first missing index.
pub fn verify_required_indexes(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let present: Vec<IndexNameRow> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type = 'index'").load(conn)?;
    for required in REQUIRED_INDEXES {
        if !present.iter().any(|row: &IndexNameRow| row.name == required) {
            return Err(PersistenceError::InitializationError(format!(
                "missing index {required}"
            )));
        }
    }
    Ok(())
}

fn configure(conn: &mut SqliteConnection, mode: StorageMode) -> Result<(), PersistenceError> {
    let mut pragmas: Vec<String> = vec![String::from("PRAGMA foreign_keys = ON")];
    if mode == StorageMode::File {
        pragmas.push(String::from("PRAGMA journal_mode = WAL"));
        pragmas.push(format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"));
    }
    for pragma in &pragmas {
        diesel::sql_query(pragma.as_str())
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))?;
    }
    debug!(?mode, "Configured SQLite connection");
    Ok(())
}

/// Opens the database at `database_url`, applies pending migrations and
/// checks the schema invariants.
///
/// # Errors
///
/// Returns an error if the connection, a PRAGMA, a migration or a schema
/// check fails.
pub fn open_database(
    database_url: &str,
    mode: StorageMode,
) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;
    configure(&mut conn, mode)?;

    let applied: usize = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?
        .len();
    verify_foreign_key_enforcement(&mut conn)?;
    verify_required_indexes(&mut conn)?;

    info!(database_url, ?mode, applied, "Opened shift accounting database");
    Ok(conn)
}
