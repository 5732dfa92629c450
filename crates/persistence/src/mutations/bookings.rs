// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use roombook::{BookingPlan, StatusChange};
use roombook_domain::{Booking, BookingId};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use crate::queries::bookings::get_booking;
use crate::repository::NewBooking;

/// Inserts a booking record exactly as given.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `record` - The booking to store
/// * `created_at` - The creation timestamp to record
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    record: &NewBooking,
    created_at: OffsetDateTime,
) -> Result<Booking, PersistenceError> {
    let approved_at: Option<String> = record.approved_at.map(encode_timestamp).transpose()?;

    diesel::insert_into(bookings::table)
        .values((
            bookings::room_id.eq(record.room_id.value()),
            bookings::user_id.eq(record.requester_id.value()),
            bookings::title.eq(&record.title),
            bookings::purpose.eq(&record.purpose),
            bookings::start_datetime.eq(encode_timestamp(record.slot.start())?),
            bookings::end_datetime.eq(encode_timestamp(record.slot.end())?),
            bookings::status.eq(record.status.as_str()),
            bookings::approver_id.eq(record.approver_id.map(|id| id.value())),
            bookings::approved_at.eq(approved_at),
            bookings::created_at.eq(encode_timestamp(created_at)?),
        ))
        .execute(conn)?;

    let booking_id: BookingId = BookingId::new(last_insert_rowid(conn)?);
    info!(
        booking_id = booking_id.value(),
        room_id = record.room_id.value(),
        status = record.status.as_str(),
        "Booking stored"
    );

    get_booking(conn, booking_id)?.ok_or_else(|| {
        PersistenceError::NotFound(format!("booking {booking_id} vanished after insert"))
    })
}

/// Stores a planned booking as `PENDING`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_booking(
    conn: &mut SqliteConnection,
    plan: &BookingPlan,
    created_at: OffsetDateTime,
) -> Result<Booking, PersistenceError> {
    let record: NewBooking = NewBooking {
        room_id: plan.room_id,
        requester_id: plan.requester_id,
        title: plan.title.clone(),
        purpose: plan.purpose.clone(),
        slot: plan.slot,
        status: plan.status(),
        approver_id: None,
        approved_at: None,
    };
    insert_booking(conn, &record, created_at)
}

/// Applies a status change only if the booking still has `change.from`.
///
/// # Errors
///
/// Returns `NotFound` if the booking does not exist, `StatusMismatch` if
/// its current status differs from `change.from`, or a database error.
pub fn update_booking_status(
    conn: &mut SqliteConnection,
    change: &StatusChange,
) -> Result<Booking, PersistenceError> {
    let approved_at: Option<String> = change.approved_at.map(encode_timestamp).transpose()?;

    let updated: usize = diesel::update(bookings::table)
        .filter(bookings::booking_id.eq(change.booking_id.value()))
        .filter(bookings::status.eq(change.from.as_str()))
        .set((
            bookings::status.eq(change.to.as_str()),
            bookings::approver_id.eq(change.approver_id.map(|id| id.value())),
            bookings::approved_at.eq(approved_at),
        ))
        .execute(conn)?;

    let current: Option<Booking> = get_booking(conn, change.booking_id)?;

    match (updated, current) {
        (_, None) => Err(PersistenceError::NotFound(format!(
            "booking {}",
            change.booking_id
        ))),
        (0, Some(booking)) => {
            warn!(
                booking_id = change.booking_id.value(),
                expected = change.from.as_str(),
                actual = booking.status.as_str(),
                "Conditional status update lost a race"
            );
            Err(PersistenceError::StatusMismatch {
                booking_id: change.booking_id.value(),
                expected: change.from,
                actual: booking.status,
            })
        }
        (_, Some(booking)) => {
            debug!(
                booking_id = change.booking_id.value(),
                from = change.from.as_str(),
                to = change.to.as_str(),
                "Booking status updated"
            );
            Ok(booking)
        }
    }
}
