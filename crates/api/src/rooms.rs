// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roombook_domain::{Room, RoomDraft, RoomId, User, validate_room_draft};
use roombook_persistence::{BookingRepository, PersistenceError};
use tracing::info;

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};

/// Lists all rooms ordered by name.
///
/// # Errors
///
/// Returns an error if the repository call fails.
pub async fn list_rooms(repository: &dyn BookingRepository) -> Result<Vec<Room>, ApiError> {
    repository
        .list_rooms()
        .await
        .map_err(translate_persistence_error)
}

/// Creates a room.
///
/// # Errors
///
/// Returns an error if the actor is not an active admin, the draft is
/// invalid, or the repository call fails.
pub async fn create_room(
    repository: &dyn BookingRepository,
    actor: &User,
    draft: &RoomDraft,
) -> Result<Room, ApiError> {
    AuthorizationService::authorize_manage_rooms(actor)?;
    validate_room_draft(draft).map_err(translate_domain_error)?;

    let room: Room = repository
        .create_room(draft)
        .await
        .map_err(translate_persistence_error)?;
    info!(room_id = %room.room_id, name = %room.name, actor = %actor.username, "Room created");
    Ok(room)
}

/// Replaces a room's details.
///
/// # Errors
///
/// Returns an error if the actor is not an active admin, the draft is
/// invalid, the room does not exist, or the repository call fails.
pub async fn update_room(
    repository: &dyn BookingRepository,
    actor: &User,
    room_id: RoomId,
    draft: &RoomDraft,
) -> Result<Room, ApiError> {
    AuthorizationService::authorize_manage_rooms(actor)?;
    validate_room_draft(draft).map_err(translate_domain_error)?;

    let room: Room = repository
        .update_room(room_id, draft)
        .await
        .map_err(|err| room_error(room_id, err))?;
    info!(room_id = %room.room_id, status = %room.status, actor = %actor.username, "Room updated");
    Ok(room)
}

/// Deletes a room. Bookings that reference it are kept.
///
/// # Errors
///
/// Returns an error if the actor is not an active admin, the room does not
/// exist, or the repository call fails.
pub async fn delete_room(
    repository: &dyn BookingRepository,
    actor: &User,
    room_id: RoomId,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_rooms(actor)?;

    repository
        .delete_room(room_id)
        .await
        .map_err(|err| room_error(room_id, err))?;
    info!(room_id = %room_id, actor = %actor.username, "Room deleted");
    Ok(())
}

fn room_error(room_id: RoomId, err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Room"),
            message: format!("Room {room_id} does not exist"),
        },
        other => translate_persistence_error(other),
    }
}
