// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use roombook_domain::{Room, RoomId};

use crate::data_models::RoomRow;
use crate::diesel_schema::rooms;
use crate::error::PersistenceError;

/// Lists all rooms ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_rooms(conn: &mut SqliteConnection) -> Result<Vec<Room>, PersistenceError> {
    let rows: Vec<RoomRow> = rooms::table
        .select(RoomRow::as_select())
        .order((rooms::name.asc(), rooms::room_id.asc()))
        .load(conn)?;

    rows.into_iter().map(Room::try_from).collect()
}

/// Retrieves a room by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the room does not exist.
pub fn get_room(
    conn: &mut SqliteConnection,
    room_id: RoomId,
) -> Result<Option<Room>, PersistenceError> {
    let row: Option<RoomRow> = rooms::table
        .find(room_id.value())
        .select(RoomRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Room::try_from).transpose()
}
