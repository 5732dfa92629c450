// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use roombook_domain::{User, UserId};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries::users::{find_user_by_username, get_user};
use crate::repository::{UpsertOutcome, UserRecord};

/// Returns true if `value` looks like a bcrypt hash (`$2a$`, `$2b$`, `$2y$`).
#[must_use]
pub fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60
        && ["$2a$", "$2b$", "$2y$"]
            .iter()
            .any(|prefix| value.starts_with(prefix))
}

/// Hashes `value` with bcrypt unless it already is a bcrypt hash.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn ensure_password_hash(value: &str) -> Result<String, PersistenceError> {
    if is_bcrypt_hash(value) {
        return Ok(value.to_string());
    }
    bcrypt::hash(value, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::PasswordHashFailed(e.to_string()))
}

/// Runs `ensure_password_hash` on the blocking thread pool.
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task is lost.
pub async fn hash_password(value: &str) -> Result<String, PersistenceError> {
    if is_bcrypt_hash(value) {
        return Ok(value.to_string());
    }
    let value: String = value.to_string();
    tokio::task::spawn_blocking(move || ensure_password_hash(&value))
        .await
        .map_err(|e| PersistenceError::PasswordHashFailed(e.to_string()))?
}

/// Updates the user with `record.username` in place, or inserts a new one.
///
/// The stored `created_at` of an existing user is kept.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `record` - The reconciled user record
/// * `password_hash` - The bcrypt hash to store in place of `record.password_hash`
/// * `now` - Creation timestamp for a new user
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_user_by_username(
    conn: &mut SqliteConnection,
    record: &UserRecord,
    password_hash: &str,
    now: OffsetDateTime,
) -> Result<(User, UpsertOutcome), PersistenceError> {
    let (user_id, outcome): (UserId, UpsertOutcome) =
        match find_user_by_username(conn, &record.username)? {
            Some(existing) => {
                diesel::update(users::table.find(existing.user_id.value()))
                    .set((
                        users::password_hash.eq(password_hash),
                        users::email.eq(record.email.as_deref()),
                        users::full_name.eq(&record.full_name),
                        users::role.eq(record.role.as_str()),
                        users::status.eq(record.status.as_str()),
                    ))
                    .execute(conn)?;
                debug!(user_id = existing.user_id.value(), "Updated existing user");
                (existing.user_id, UpsertOutcome::Updated)
            }
            None => {
                diesel::insert_into(users::table)
                    .values((
                        users::username.eq(&record.username),
                        users::password_hash.eq(password_hash),
                        users::email.eq(record.email.as_deref()),
                        users::full_name.eq(&record.full_name),
                        users::role.eq(record.role.as_str()),
                        users::status.eq(record.status.as_str()),
                        users::created_at.eq(encode_timestamp(now)?),
                    ))
                    .execute(conn)?;
                (UserId::new(last_insert_rowid(conn)?), UpsertOutcome::Inserted)
            }
        };

    info!(
        user_id = user_id.value(),
        username = %record.username,
        ?outcome,
        "User reconciled"
    );

    let user: User = get_user(conn, user_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("user {user_id}")))?;
    Ok((user, outcome))
}
