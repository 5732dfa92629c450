// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use roombook_domain::{Booking, BookingId};
use tracing::debug;

use crate::data_models::BookingRow;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use crate::repository::BookingQuery;

/// Lists bookings matching `query`, most recent first.
///
/// Ties on `created_at` are broken by descending id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_bookings(
    conn: &mut SqliteConnection,
    query: &BookingQuery,
) -> Result<Vec<Booking>, PersistenceError> {
    debug!(?query, "Listing bookings");

    let mut statement = bookings::table
        .select(BookingRow::as_select())
        .into_boxed::<Sqlite>();

    if let Some(room_id) = query.room_id {
        statement = statement.filter(bookings::room_id.eq(room_id.value()));
    }
    if let Some(user_id) = query.user_id {
        statement = statement.filter(bookings::user_id.eq(user_id.value()));
    }
    if let Some(status) = query.status {
        statement = statement.filter(bookings::status.eq(status.as_str()));
    }

    let rows: Vec<BookingRow> = statement
        .order((bookings::created_at.desc(), bookings::booking_id.desc()))
        .load(conn)?;

    rows.into_iter().map(Booking::try_from).collect()
}

/// Retrieves a booking by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the booking does not exist.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<Option<Booking>, PersistenceError> {
    let row: Option<BookingRow> = bookings::table
        .find(booking_id.value())
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Booking::try_from).transpose()
}
