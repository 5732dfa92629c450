// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::BookingRequest;
use crate::error::CoreError;
use crate::state::{BookingPlan, RoomSchedule, StatusChange};
use roombook_domain::{
    Booking, BookingStatus, DomainError, TimeSlot, User, validate_booking_fields,
};
use time::OffsetDateTime;

/// Checks a booking request against a room's schedule.
///
/// Checks run in order: required fields and interval, requester account,
/// room status, then conflicts. A malformed request never reaches the
/// conflict check.
///
/// # Arguments
///
/// * `schedule` - The target room and its recorded bookings
/// * `requester` - The user asking for the room
/// * `request` - The raw request
///
/// # Returns
///
/// * `Ok(BookingPlan)` describing the `PENDING` booking to store
/// * `Err(CoreError)` if the request must be refused
///
/// # Errors
///
/// Returns an error if:
/// - The title is blank or `start >= end`
/// - The requester account is inactive
/// - The room is under maintenance
/// - A `PENDING` or `APPROVED` booking on the room overlaps the slot
pub fn plan_booking(
    schedule: &RoomSchedule,
    requester: &User,
    request: BookingRequest,
) -> Result<BookingPlan, CoreError> {
    let (title, slot): (String, TimeSlot) =
        validate_booking_fields(&request.title, request.start, request.end)?;

    if !requester.is_active() {
        return Err(CoreError::Unauthorized {
            action: "create booking",
            reason: format!("account '{}' is inactive", requester.username),
        });
    }

    if !schedule.room.is_bookable() {
        return Err(CoreError::DomainViolation(DomainError::RoomUnavailable {
            room_id: schedule.room.room_id.value(),
        }));
    }

    if schedule
        .index()
        .has_conflict(schedule.room.room_id, &slot, None)
    {
        return Err(CoreError::Conflict {
            room_id: schedule.room.room_id,
        });
    }

    Ok(BookingPlan {
        room_id: schedule.room.room_id,
        requester_id: requester.user_id,
        title,
        purpose: request.purpose.trim().to_string(),
        slot,
    })
}

/// Decides whether `actor` may move `booking` to `target`.
///
/// Approve and reject require a reviewer role and stamp the reviewer and
/// `now`. Cancel is open to reviewers and to the booking's own requester;
/// cancelling an approved booking keeps its review stamp.
///
/// # Errors
///
/// Returns an error if:
/// - The actor account is inactive
/// - The transition is not in the booking lifecycle
/// - The actor's role or ownership does not permit it
pub fn plan_status_change(
    booking: &Booking,
    actor: &User,
    target: BookingStatus,
    now: OffsetDateTime,
) -> Result<StatusChange, CoreError> {
    if !actor.is_active() {
        return Err(CoreError::Unauthorized {
            action: "change booking status",
            reason: format!("account '{}' is inactive", actor.username),
        });
    }

    booking.status.validate_transition(target)?;

    match target {
        BookingStatus::Approved | BookingStatus::Rejected => {
            if !actor.role.can_review() {
                return Err(CoreError::Unauthorized {
                    action: "review booking",
                    reason: format!("role {} cannot approve or reject bookings", actor.role),
                });
            }
            Ok(StatusChange {
                booking_id: booking.booking_id,
                from: booking.status,
                to: target,
                approver_id: Some(actor.user_id),
                approved_at: Some(now),
            })
        }
        BookingStatus::Cancelled => {
            if !actor.role.can_review() && actor.user_id != booking.requester_id {
                return Err(CoreError::Unauthorized {
                    action: "cancel booking",
                    reason: String::from("only the requester or a reviewer may cancel"),
                });
            }
            Ok(StatusChange {
                booking_id: booking.booking_id,
                from: booking.status,
                to: target,
                approver_id: booking.approver_id,
                approved_at: booking.approved_at,
            })
        }
        // validate_transition never admits a move back to PENDING
        BookingStatus::Pending => Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: booking.status.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("bookings cannot return to PENDING"),
            },
        )),
    }
}
