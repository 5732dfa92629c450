// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use roombook_domain::{User, UserId};
use tracing::debug;

use crate::data_models::{StoredUser, UserRow};
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Lists all users with their password hashes, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_stored_users(conn: &mut SqliteConnection) -> Result<Vec<StoredUser>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .select(UserRow::as_select())
        .order((users::created_at.desc(), users::user_id.desc()))
        .load(conn)?;

    rows.into_iter().map(UserRow::into_stored).collect()
}

/// Lists all users, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    Ok(list_stored_users(conn)?
        .into_iter()
        .map(|stored| stored.user)
        .collect())
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the user does not exist.
pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<Option<User>, PersistenceError> {
    let row: Option<UserRow> = users::table
        .find(user_id.value())
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(User::try_from).transpose()
}

/// Retrieves a user by username (exact match).
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if no user has that username.
pub fn find_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, PersistenceError> {
    debug!(username, "Looking up user by username");

    let row: Option<UserRow> = users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(User::try_from).transpose()
}
