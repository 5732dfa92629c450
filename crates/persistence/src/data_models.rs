// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Timestamps are stored as fixed-width UTC text so that text comparison
//! in SQL orders them chronologically.

use diesel::prelude::*;
use roombook_domain::{
    AccountStatus, Booking, BookingId, BookingStatus, Room, RoomId, RoomStatus, TimeSlot, User,
    UserId, UserRole, parse_timestamp,
};
use std::str::FromStr;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{bookings, rooms, users};
use crate::error::PersistenceError;

/// Encodes a timestamp for storage, e.g. `2024-01-15T09:00:00.000000Z`.
///
/// # Errors
///
/// Returns an error if the value cannot be formatted.
pub fn encode_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
        ))
        .map_err(|e| PersistenceError::TimestampEncoding(e.to_string()))
}

fn decode_timestamp(field: &'static str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    parse_timestamp(field, value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

fn decode_enum<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = roombook_domain::DomainError>,
{
    T::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Diesel Queryable struct for room rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rooms)]
pub struct RoomRow {
    room_id: i64,
    name: String,
    location: String,
    capacity: i64,
    equipment: String,
    image_url: Option<String>,
    status: String,
}

impl TryFrom<RoomRow> for Room {
    type Error = PersistenceError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: RoomId::new(row.room_id),
            name: row.name,
            location: row.location,
            capacity: row.capacity,
            equipment: row.equipment,
            image_url: row.image_url,
            status: decode_enum::<RoomStatus>(&row.status)?,
        })
    }
}

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct UserRow {
    user_id: i64,
    username: String,
    password_hash: String,
    email: Option<String>,
    full_name: String,
    role: String,
    status: String,
    created_at: String,
}

impl UserRow {
    /// Converts the row, keeping the stored password hash alongside.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value is not valid.
    pub fn into_stored(self) -> Result<StoredUser, PersistenceError> {
        let user: User = User {
            user_id: UserId::new(self.user_id),
            username: self.username,
            full_name: self.full_name,
            email: self.email,
            role: decode_enum::<UserRole>(&self.role)?,
            status: decode_enum::<AccountStatus>(&self.status)?,
            created_at: decode_timestamp("created_at", &self.created_at)?,
        };
        Ok(StoredUser {
            user,
            password_hash: self.password_hash,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        row.into_stored().map(|stored| stored.user)
    }
}

/// A user together with the stored bcrypt hash.
///
/// Only data export needs the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    booking_id: i64,
    room_id: i64,
    user_id: i64,
    title: String,
    purpose: String,
    start_datetime: String,
    end_datetime: String,
    status: String,
    approver_id: Option<i64>,
    approved_at: Option<String>,
    created_at: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let start: OffsetDateTime = decode_timestamp("start_datetime", &row.start_datetime)?;
        let end: OffsetDateTime = decode_timestamp("end_datetime", &row.end_datetime)?;
        let slot: TimeSlot = TimeSlot::new(start, end).map_err(|e| {
            PersistenceError::ReconstructionError(format!("booking {}: {e}", row.booking_id))
        })?;
        let approved_at: Option<OffsetDateTime> = row
            .approved_at
            .as_deref()
            .map(|value| decode_timestamp("approved_at", value))
            .transpose()?;

        Ok(Self {
            booking_id: BookingId::new(row.booking_id),
            room_id: RoomId::new(row.room_id),
            requester_id: UserId::new(row.user_id),
            title: row.title,
            purpose: row.purpose,
            slot,
            status: decode_enum::<BookingStatus>(&row.status)?,
            approver_id: row.approver_id.map(UserId::new),
            approved_at,
            created_at: decode_timestamp("created_at", &row.created_at)?,
        })
    }
}
