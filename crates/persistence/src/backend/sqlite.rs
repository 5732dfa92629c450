// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and configuring `SQLite` connections.
//!
//! Every connection gets `foreign_keys = ON` and the embedded migrations.
//! File databases additionally run in WAL mode with a busy timeout so the
//! server and the admin CLI can share one file.

use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const CONNECTION_PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON"];
const FILE_PRAGMAS: &[&str] = &["PRAGMA journal_mode = WAL", "PRAGMA busy_timeout = 5000"];

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Row id assigned by the most recent insert on `conn`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Opens `database_url`, configures the connection, and migrates it.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated, or if
/// foreign keys are still off afterwards.
pub fn open(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;
    apply_pragmas(&mut conn, CONNECTION_PRAGMAS)?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    debug!("Schema is up to date");

    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result(&mut conn)?;
    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeysDisabled);
    }

    Ok(conn)
}

/// Opens a database file, creating it if missing.
///
/// # Errors
///
/// See [`open`]. Also fails if WAL mode cannot be enabled.
pub fn open_file(path: &str) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = open(path)?;
    apply_pragmas(&mut conn, FILE_PRAGMAS)?;
    Ok(conn)
}

fn apply_pragmas(conn: &mut SqliteConnection, pragmas: &[&str]) -> Result<(), PersistenceError> {
    for pragma in pragmas {
        conn.batch_execute(pragma)
            .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))?;
    }
    Ok(())
}
