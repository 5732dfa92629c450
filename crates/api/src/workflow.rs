// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking workflow: create requests and move them through review.
//!
//! Each operation loads a snapshot from the repository, asks the core to
//! plan the change, persists the plan, and only then hands the resulting
//! notification to the dispatcher.

use roombook::{
    BookingPlan, BookingRequest, NotificationEvent, RoomSchedule, StatusChange, plan_booking,
    plan_status_change,
};
use roombook_domain::{
    Booking, BookingId, BookingStatus, Room, RoomId, User, UserId, parse_timestamp,
    validate_booking_fields,
};
use roombook_persistence::{BookingQuery, BookingRepository};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::resolve_actor;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::notification::{NotificationDispatcher, spawn_dispatch};
use crate::request_response::CreateBookingRequest;

/// Creates a booking in `PENDING`.
///
/// Input is validated before any repository call. The slot is then checked
/// against every booking on the room that still holds its time.
///
/// # Arguments
///
/// * `repository` - The booking repository
/// * `dispatcher` - Receives `NEW_BOOKING` once the booking is stored
/// * `request` - The booking request
///
/// # Errors
///
/// Returns an error if:
/// - A required field is blank, a timestamp is malformed, or `start >= end`
/// - The room or requester does not exist
/// - The requester's account is inactive
/// - The room is under maintenance
/// - The slot overlaps a `PENDING` or `APPROVED` booking on the room
/// - The repository call fails
pub async fn create_booking(
    repository: &dyn BookingRepository,
    dispatcher: &Arc<dyn NotificationDispatcher>,
    request: CreateBookingRequest,
) -> Result<Booking, ApiError> {
    let start: OffsetDateTime = parse_timestamp("start_datetime", &request.start_datetime)
        .map_err(translate_domain_error)?;
    let end: OffsetDateTime = parse_timestamp("end_datetime", &request.end_datetime)
        .map_err(translate_domain_error)?;
    validate_booking_fields(&request.title, start, end).map_err(translate_domain_error)?;

    let room_id: RoomId = RoomId::new(request.room_id);
    let room: Room = repository
        .get_room(room_id)
        .await
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Room"),
            message: format!("Room {room_id} does not exist"),
        })?;
    let requester: User = resolve_actor(repository, UserId::new(request.requester_id)).await?;

    let bookings: Vec<Booking> = repository
        .list_bookings(&BookingQuery::for_room(room_id))
        .await
        .map_err(translate_persistence_error)?;
    let schedule: RoomSchedule = RoomSchedule::new(room, bookings);

    let plan: BookingPlan = plan_booking(
        &schedule,
        &requester,
        BookingRequest {
            room_id,
            requester_id: requester.user_id,
            title: request.title,
            purpose: request.purpose,
            start,
            end,
        },
    )
    .map_err(|err| {
        debug!(room_id = %room_id, error = %err, "Booking request refused");
        translate_core_error(err)
    })?;

    let booking: Booking = repository
        .create_booking(&plan)
        .await
        .map_err(translate_persistence_error)?;

    info!(
        booking_id = %booking.booking_id,
        room_id = %booking.room_id,
        requester_id = %booking.requester_id,
        "Booking created"
    );
    spawn_dispatch(dispatcher, NotificationEvent::new_booking(booking.booking_id));

    Ok(booking)
}

/// Moves a booking to `target`.
///
/// The stored update is conditional on the status the plan was made
/// against, so a booking reviewed concurrently by someone else is
/// reported as an illegal transition instead of being overwritten.
///
/// # Arguments
///
/// * `repository` - The booking repository
/// * `dispatcher` - Receives `BOOKING_STATUS_UPDATE` for review decisions
///   and for withdrawal of a pending request
/// * `booking_id` - The booking to change
/// * `actor_id` - The user performing the change
/// * `target` - The requested status
///
/// # Errors
///
/// Returns an error if:
/// - The booking or actor does not exist
/// - The transition is not legal from the current status
/// - The actor may not perform it
/// - The booking changed status since it was read
/// - The repository call fails
pub async fn set_booking_status(
    repository: &dyn BookingRepository,
    dispatcher: &Arc<dyn NotificationDispatcher>,
    booking_id: BookingId,
    actor_id: UserId,
    target: BookingStatus,
) -> Result<Booking, ApiError> {
    let booking: Booking = repository
        .get_booking(booking_id)
        .await
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {booking_id} does not exist"),
        })?;
    let actor: User = resolve_actor(repository, actor_id).await?;

    let change: StatusChange = plan_status_change(
        &booking,
        &actor,
        target,
        OffsetDateTime::now_utc(),
    )
    .map_err(|err| {
        debug!(
            booking_id = %booking_id,
            actor_id = %actor_id,
            error = %err,
            "Status change refused"
        );
        translate_core_error(err)
    })?;

    let updated: Booking = repository
        .update_booking_status(&change)
        .await
        .map_err(translate_persistence_error)?;

    info!(
        booking_id = %updated.booking_id,
        from = %change.from,
        to = %change.to,
        actor_id = %actor_id,
        "Booking status changed"
    );
    if let Some(event) = change.notification() {
        spawn_dispatch(dispatcher, event);
    }

    Ok(updated)
}
