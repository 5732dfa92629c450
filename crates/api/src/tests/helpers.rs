// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use async_trait::async_trait;
use roombook::{BookingPlan, NotificationEvent, StatusChange};
use roombook_domain::{
    AccountStatus, Booking, BookingId, Room, RoomDraft, RoomId, RoomStatus, User, UserId,
    UserRole,
};
use roombook_persistence::{
    BookingQuery, BookingRepository, NewBooking, Persistence, PersistenceError, StoredUser,
    UpsertOutcome, UserRecord,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{CreateBookingRequest, NotificationDispatcher, NotificationError};

/// A syntactically valid bcrypt hash, so tests skip the hashing cost.
pub const TEST_HASH: &str = "$2b$12$abcdefghijklmnopqrstuuMYcnzQm0Ulp8pVvQ8s0w5xWkUQeYQ1K";

/// Forwards every event to a channel.
pub struct RecordingDispatcher {
    sender: UnboundedSender<NotificationEvent>,
}

impl RecordingDispatcher {
    pub fn create() -> (Arc<dyn NotificationDispatcher>, UnboundedReceiver<NotificationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event: NotificationEvent) -> Result<(), NotificationError> {
        self.sender
            .send(event)
            .map_err(|_| NotificationError::ChannelClosed)
    }
}

/// Fails every delivery.
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn dispatch(&self, _event: NotificationEvent) -> Result<(), NotificationError> {
        Err(NotificationError::Delivery(String::from("mail server down")))
    }
}

pub async fn next_event(receiver: &mut UnboundedReceiver<NotificationEvent>) -> NotificationEvent {
    tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("timed out waiting for a notification")
        .expect("notification channel closed")
}

pub async fn assert_no_event(receiver: &mut UnboundedReceiver<NotificationEvent>) {
    let outcome = tokio::time::timeout(Duration::from_millis(100), receiver.recv()).await;
    assert!(outcome.is_err(), "unexpected notification: {outcome:?}");
}

/// Delegates reads and fails every write with a storage error.
pub struct FailingRepository {
    inner: Persistence,
}

impl FailingRepository {
    pub const fn new(inner: Persistence) -> Self {
        Self { inner }
    }

    fn failure() -> PersistenceError {
        PersistenceError::DatabaseError(String::from("disk I/O error"))
    }
}

#[async_trait]
impl BookingRepository for FailingRepository {
    async fn list_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>, PersistenceError> {
        self.inner.list_bookings(query).await
    }

    async fn get_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, PersistenceError> {
        self.inner.get_booking(booking_id).await
    }

    async fn create_booking(&self, _plan: &BookingPlan) -> Result<Booking, PersistenceError> {
        Err(Self::failure())
    }

    async fn update_booking_status(
        &self,
        _change: &StatusChange,
    ) -> Result<Booking, PersistenceError> {
        Err(Self::failure())
    }

    async fn insert_booking(&self, _record: &NewBooking) -> Result<Booking, PersistenceError> {
        Err(Self::failure())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, PersistenceError> {
        self.inner.list_rooms().await
    }

    async fn get_room(&self, room_id: RoomId) -> Result<Option<Room>, PersistenceError> {
        self.inner.get_room(room_id).await
    }

    async fn create_room(&self, _draft: &RoomDraft) -> Result<Room, PersistenceError> {
        Err(Self::failure())
    }

    async fn update_room(
        &self,
        _room_id: RoomId,
        _draft: &RoomDraft,
    ) -> Result<Room, PersistenceError> {
        Err(Self::failure())
    }

    async fn delete_room(&self, _room_id: RoomId) -> Result<(), PersistenceError> {
        Err(Self::failure())
    }

    async fn list_users(&self) -> Result<Vec<User>, PersistenceError> {
        self.inner.list_users().await
    }

    async fn list_stored_users(&self) -> Result<Vec<StoredUser>, PersistenceError> {
        self.inner.list_stored_users().await
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, PersistenceError> {
        self.inner.get_user(user_id).await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, PersistenceError> {
        self.inner.find_user_by_username(username).await
    }

    async fn upsert_user_by_username(
        &self,
        _record: &UserRecord,
    ) -> Result<(User, UpsertOutcome), PersistenceError> {
        Err(Self::failure())
    }
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_room_draft(name: &str) -> RoomDraft {
    RoomDraft {
        name: name.to_string(),
        location: String::from("Floor 3"),
        capacity: 8,
        equipment: String::from("Projector"),
        image_url: None,
        status: RoomStatus::Active,
    }
}

pub async fn create_test_room(repository: &dyn BookingRepository, name: &str) -> Room {
    repository
        .create_room(&create_test_room_draft(name))
        .await
        .expect("room")
}

pub async fn create_test_user(
    repository: &dyn BookingRepository,
    username: &str,
    role: UserRole,
) -> User {
    create_test_user_with_status(repository, username, role, AccountStatus::Active).await
}

pub async fn create_test_user_with_status(
    repository: &dyn BookingRepository,
    username: &str,
    role: UserRole,
    status: AccountStatus,
) -> User {
    let record: UserRecord = UserRecord {
        username: username.to_string(),
        password_hash: TEST_HASH.to_string(),
        email: None,
        full_name: format!("{username} tester"),
        role,
        status,
    };
    repository
        .upsert_user_by_username(&record)
        .await
        .expect("user")
        .0
}

/// A request on 2024-01-15 between two `HH:MM` times, UTC.
pub fn create_test_request(
    room: &Room,
    requester: &User,
    start: &str,
    end: &str,
) -> CreateBookingRequest {
    CreateBookingRequest {
        room_id: room.room_id.value(),
        requester_id: requester.user_id.value(),
        title: String::from("Team sync"),
        purpose: String::from("Weekly planning"),
        start_datetime: format!("2024-01-15T{start}:00Z"),
        end_datetime: format!("2024-01-15T{end}:00Z"),
    }
}
