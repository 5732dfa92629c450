// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the room booking engine.
//!
//! This crate defines the storage contract, `BookingRepository`, and its
//! Diesel implementation over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is bundled with the binary, so no external database is needed.
//! A file database serves the server and the admin CLI; an in-memory
//! database, isolated per `Persistence` value, serves tests.
//!
//! ## Concurrency
//!
//! All calls on one `Persistence` are serialized through a single
//! connection. Status updates are conditional on the status the caller
//! last saw, so a concurrent review of the same booking surfaces as
//! `PersistenceError::StatusMismatch` rather than a silent overwrite.
//!
//! ## Referential integrity
//!
//! Bookings carry no foreign keys. Deleting a room or user leaves the
//! bookings that reference it in place.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use async_trait::async_trait;
use diesel::SqliteConnection;
use roombook::{BookingPlan, StatusChange};
use roombook_domain::{Booking, BookingId, Room, RoomDraft, RoomId, User, UserId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repository;

#[cfg(test)]
mod tests;

pub use data_models::StoredUser;
pub use error::PersistenceError;
pub use mutations::users::is_bcrypt_hash;
pub use repository::{BookingQuery, BookingRepository, NewBooking, UpsertOutcome, UserRecord};

/// `SQLite` implementation of `BookingRepository`.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives its own shared-cache database, named from an
    /// atomic counter, so tests never see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:roombook_mem_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::open(&shared_memory_url)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// The file is created if missing and migrated to the current schema.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path: &Path = path.as_ref();
        let path_str: &str = path
            .to_str()
            .ok_or_else(|| PersistenceError::InvalidPath(path.display().to_string()))?;

        let conn: SqliteConnection = backend::sqlite::open_file(path_str)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl BookingRepository for Persistence {
    async fn list_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::bookings::list_bookings(&mut conn, query)
    }

    async fn get_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::bookings::get_booking(&mut conn, booking_id)
    }

    async fn create_booking(&self, plan: &BookingPlan) -> Result<Booking, PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::bookings::create_booking(&mut conn, plan, OffsetDateTime::now_utc())
    }

    async fn update_booking_status(
        &self,
        change: &StatusChange,
    ) -> Result<Booking, PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::bookings::update_booking_status(&mut conn, change)
    }

    async fn insert_booking(&self, record: &NewBooking) -> Result<Booking, PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::bookings::insert_booking(&mut conn, record, OffsetDateTime::now_utc())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::rooms::list_rooms(&mut conn)
    }

    async fn get_room(&self, room_id: RoomId) -> Result<Option<Room>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::rooms::get_room(&mut conn, room_id)
    }

    async fn create_room(&self, draft: &RoomDraft) -> Result<Room, PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::rooms::create_room(&mut conn, draft)
    }

    async fn update_room(
        &self,
        room_id: RoomId,
        draft: &RoomDraft,
    ) -> Result<Room, PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::rooms::update_room(&mut conn, room_id, draft)
    }

    async fn delete_room(&self, room_id: RoomId) -> Result<(), PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::rooms::delete_room(&mut conn, room_id)
    }

    async fn list_users(&self) -> Result<Vec<User>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::users::list_users(&mut conn)
    }

    async fn list_stored_users(&self) -> Result<Vec<StoredUser>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::users::list_stored_users(&mut conn)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::users::get_user(&mut conn, user_id)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.conn.lock().await;
        queries::users::find_user_by_username(&mut conn, username)
    }

    async fn upsert_user_by_username(
        &self,
        record: &UserRecord,
    ) -> Result<(User, UpsertOutcome), PersistenceError> {
        let password_hash: String = mutations::users::hash_password(&record.password_hash).await?;
        let mut conn = self.conn.lock().await;
        mutations::users::upsert_user_by_username(
            &mut conn,
            record,
            &password_hash,
            OffsetDateTime::now_utc(),
        )
    }
}
