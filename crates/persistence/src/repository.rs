// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage contract used by the booking workflow and importer.

use async_trait::async_trait;
use roombook::{BookingPlan, StatusChange};
use roombook_domain::{
    AccountStatus, Booking, BookingId, BookingStatus, Room, RoomDraft, RoomId, TimeSlot, User,
    UserId, UserRole,
};
use time::OffsetDateTime;

use crate::data_models::StoredUser;
use crate::error::PersistenceError;

/// Predicates pushed down to storage when listing bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub room_id: Option<RoomId>,
    pub user_id: Option<UserId>,
    pub status: Option<BookingStatus>,
}

impl BookingQuery {
    /// Bookings on one room, in any status.
    #[must_use]
    pub fn for_room(room_id: RoomId) -> Self {
        Self {
            room_id: Some(room_id),
            ..Self::default()
        }
    }
}

/// A booking record stored as given, used by bulk loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_id: RoomId,
    pub requester_id: UserId,
    pub title: String,
    pub purpose: String,
    pub slot: TimeSlot,
    pub status: BookingStatus,
    pub approver_id: Option<UserId>,
    pub approved_at: Option<OffsetDateTime>,
}

/// A user record reconciled by `username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    /// A bcrypt hash, or a plain password to be hashed before storage.
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    pub status: AccountStatus,
}

/// Whether an upsert created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Persists and queries rooms, users and bookings.
///
/// Every call may suspend. Implementations report I/O failure as
/// `PersistenceError` and never retry internally.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Lists bookings matching every set predicate, most recent first.
    async fn list_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>, PersistenceError>;

    /// Returns a booking, or `None` if it does not exist.
    async fn get_booking(&self, booking_id: BookingId)
    -> Result<Option<Booking>, PersistenceError>;

    /// Stores a planned booking as `PENDING`.
    async fn create_booking(&self, plan: &BookingPlan) -> Result<Booking, PersistenceError>;

    /// Applies a status change if the booking still has `change.from`.
    ///
    /// Fails with `NotFound` if the booking is gone, or `StatusMismatch`
    /// if its status moved since the change was planned.
    async fn update_booking_status(
        &self,
        change: &StatusChange,
    ) -> Result<Booking, PersistenceError>;

    /// Stores a booking record exactly as given.
    async fn insert_booking(&self, record: &NewBooking) -> Result<Booking, PersistenceError>;

    /// Lists rooms ordered by name.
    async fn list_rooms(&self) -> Result<Vec<Room>, PersistenceError>;

    async fn get_room(&self, room_id: RoomId) -> Result<Option<Room>, PersistenceError>;

    async fn create_room(&self, draft: &RoomDraft) -> Result<Room, PersistenceError>;

    /// Replaces a room's details. Fails with `NotFound` if it does not exist.
    async fn update_room(
        &self,
        room_id: RoomId,
        draft: &RoomDraft,
    ) -> Result<Room, PersistenceError>;

    /// Deletes a room. Its bookings are left in place.
    async fn delete_room(&self, room_id: RoomId) -> Result<(), PersistenceError>;

    /// Lists users, most recent first.
    async fn list_users(&self) -> Result<Vec<User>, PersistenceError>;

    /// Lists users with their stored password hashes, most recent first.
    async fn list_stored_users(&self) -> Result<Vec<StoredUser>, PersistenceError>;

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, PersistenceError>;

    async fn find_user_by_username(&self, username: &str)
    -> Result<Option<User>, PersistenceError>;

    /// Updates the user with `record.username` in place, or inserts it.
    async fn upsert_user_by_username(
        &self,
        record: &UserRecord,
    ) -> Result<(User, UpsertOutcome), PersistenceError>;
}
