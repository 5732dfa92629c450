// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of users and bookings.
//!
//! Output starts with a UTF-8 BOM so spreadsheet tools pick the right
//! encoding. Column names match the import schemas, so an export can be
//! re-imported as is.

use csv::Writer;
use roombook_domain::{Booking, Room, RoomId, User, UserId, format_timestamp};
use roombook_persistence::{BookingQuery, BookingRepository, StoredUser};
use std::collections::HashMap;
use tracing::info;

use crate::error::{ApiError, translate_persistence_error};
use crate::import::RecordKind;

const UTF8_BOM: &str = "\u{feff}";

const USER_HEADERS: &[&str] = &[
    "id",
    "username",
    "password_hash",
    "email",
    "full_name",
    "role",
    "status",
    "created_at",
];

const BOOKING_HEADERS: &[&str] = &[
    "id",
    "room_id",
    "room_name",
    "user_id",
    "username",
    "user_full_name",
    "title",
    "purpose",
    "start_datetime",
    "end_datetime",
    "status",
    "approver_id",
    "approved_at",
    "created_at",
];

fn write_csv(headers: &[&str], rows: Vec<Vec<String>>) -> Result<String, ApiError> {
    let csv_error = |e: csv::Error| ApiError::Internal {
        message: format!("Failed to write CSV: {e}"),
    };

    let mut writer: Writer<Vec<u8>> = Writer::from_writer(UTF8_BOM.as_bytes().to_vec());
    writer.write_record(headers).map_err(csv_error)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_error)?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV output is not UTF-8: {e}"),
    })
}

/// Exports every user, most recent first, including stored password hashes.
///
/// # Errors
///
/// Returns an error if the repository call fails.
pub async fn export_users_csv(repository: &dyn BookingRepository) -> Result<String, ApiError> {
    let users: Vec<StoredUser> = repository
        .list_stored_users()
        .await
        .map_err(translate_persistence_error)?;

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|stored| {
            let user: &User = &stored.user;
            vec![
                user.user_id.to_string(),
                user.username.clone(),
                stored.password_hash.clone(),
                user.email.clone().unwrap_or_default(),
                user.full_name.clone(),
                user.role.as_str().to_string(),
                user.status.as_str().to_string(),
                format_timestamp(user.created_at),
            ]
        })
        .collect();

    info!(count = rows.len(), "Exported users");
    write_csv(USER_HEADERS, rows)
}

/// Exports every booking, most recent first, with room and requester names.
///
/// Names of deleted rooms and users are left blank.
///
/// # Errors
///
/// Returns an error if a repository call fails.
pub async fn export_bookings_csv(repository: &dyn BookingRepository) -> Result<String, ApiError> {
    let bookings: Vec<Booking> = repository
        .list_bookings(&BookingQuery::default())
        .await
        .map_err(translate_persistence_error)?;
    let rooms: Vec<Room> = repository
        .list_rooms()
        .await
        .map_err(translate_persistence_error)?;
    let users: Vec<User> = repository
        .list_users()
        .await
        .map_err(translate_persistence_error)?;

    let room_names: HashMap<RoomId, &str> = rooms
        .iter()
        .map(|room| (room.room_id, room.name.as_str()))
        .collect();
    let users_by_id: HashMap<UserId, &User> =
        users.iter().map(|user| (user.user_id, user)).collect();

    let rows: Vec<Vec<String>> = bookings
        .iter()
        .map(|booking| {
            let requester: Option<&&User> = users_by_id.get(&booking.requester_id);
            vec![
                booking.booking_id.to_string(),
                booking.room_id.to_string(),
                room_names
                    .get(&booking.room_id)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                booking.requester_id.to_string(),
                requester.map(|user| user.username.clone()).unwrap_or_default(),
                requester
                    .map(|user| user.full_name.clone())
                    .unwrap_or_default(),
                booking.title.clone(),
                booking.purpose.clone(),
                format_timestamp(booking.slot.start()),
                format_timestamp(booking.slot.end()),
                booking.status.as_str().to_string(),
                booking
                    .approver_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                booking.approved_at.map(format_timestamp).unwrap_or_default(),
                format_timestamp(booking.created_at),
            ]
        })
        .collect();

    info!(count = rows.len(), "Exported bookings");
    write_csv(BOOKING_HEADERS, rows)
}

/// Exports either kind.
///
/// # Errors
///
/// Returns an error if a repository call fails.
pub async fn export_csv(
    repository: &dyn BookingRepository,
    kind: RecordKind,
) -> Result<String, ApiError> {
    match kind {
        RecordKind::Users => export_users_csv(repository).await,
        RecordKind::Bookings => export_bookings_csv(repository).await,
    }
}
