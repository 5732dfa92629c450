// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use roombook_domain::{Room, RoomDraft, RoomId};
use tracing::info;

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::rooms;
use crate::error::PersistenceError;

/// Creates a room.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_room(conn: &mut SqliteConnection, draft: &RoomDraft) -> Result<Room, PersistenceError> {
    diesel::insert_into(rooms::table)
        .values((
            rooms::name.eq(&draft.name),
            rooms::location.eq(&draft.location),
            rooms::capacity.eq(draft.capacity),
            rooms::equipment.eq(&draft.equipment),
            rooms::image_url.eq(draft.image_url.as_deref()),
            rooms::status.eq(draft.status.as_str()),
        ))
        .execute(conn)?;

    let room_id: RoomId = RoomId::new(last_insert_rowid(conn)?);
    info!(room_id = room_id.value(), name = %draft.name, "Room created");

    Ok(Room::from_draft(room_id, draft.clone()))
}

/// Replaces a room's details.
///
/// # Errors
///
/// Returns `NotFound` if the room does not exist, or a database error.
pub fn update_room(
    conn: &mut SqliteConnection,
    room_id: RoomId,
    draft: &RoomDraft,
) -> Result<Room, PersistenceError> {
    let updated: usize = diesel::update(rooms::table.find(room_id.value()))
        .set((
            rooms::name.eq(&draft.name),
            rooms::location.eq(&draft.location),
            rooms::capacity.eq(draft.capacity),
            rooms::equipment.eq(&draft.equipment),
            rooms::image_url.eq(draft.image_url.as_deref()),
            rooms::status.eq(draft.status.as_str()),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("room {room_id}")));
    }

    info!(room_id = room_id.value(), status = draft.status.as_str(), "Room updated");
    Ok(Room::from_draft(room_id, draft.clone()))
}

/// Deletes a room. Bookings that reference it are kept.
///
/// # Errors
///
/// Returns `NotFound` if the room does not exist, or a database error.
pub fn delete_room(conn: &mut SqliteConnection, room_id: RoomId) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(rooms::table.find(room_id.value())).execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("room {room_id}")));
    }

    info!(room_id = room_id.value(), "Room deleted");
    Ok(())
}
