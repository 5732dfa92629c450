// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time slots and room conflict detection.

use crate::error::DomainError;
use crate::timestamp::format_timestamp;
use crate::types::{Booking, BookingId, RoomId};
use time::OffsetDateTime;

/// A half-open interval `[start, end)` of room occupancy.
///
/// A slot can only be built with `start < end`, so every `TimeSlot`
/// in the system is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl TimeSlot {
    /// Creates a new slot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInterval` if `start >= end`.
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidInterval {
                start: format_timestamp(start),
                end: format_timestamp(end),
            });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> OffsetDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Returns true if the two slots share at least one instant.
    ///
    /// A slot ending exactly when the other begins does not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Conflict lookup over a set of bookings already fetched for inspection.
///
/// Only `PENDING` and `APPROVED` bookings hold their slot.
#[derive(Debug, Clone, Copy)]
pub struct IntervalIndex<'a> {
    bookings: &'a [Booking],
}

impl<'a> IntervalIndex<'a> {
    #[must_use]
    pub const fn new(bookings: &'a [Booking]) -> Self {
        Self { bookings }
    }

    /// Returns the first blocking booking on `room_id` overlapping `slot`.
    ///
    /// # Arguments
    ///
    /// * `room_id` - The room to check
    /// * `slot` - The proposed occupancy
    /// * `exclude` - A booking to ignore, so an existing booking can be re-checked against the rest
    #[must_use]
    pub fn find_conflict(
        &self,
        room_id: RoomId,
        slot: &TimeSlot,
        exclude: Option<BookingId>,
    ) -> Option<&'a Booking> {
        self.bookings.iter().find(|booking| {
            booking.room_id == room_id
                && booking.status.is_blocking()
                && Some(booking.booking_id) != exclude
                && booking.slot.overlaps(slot)
        })
    }

    /// Returns true if `slot` collides with a blocking booking on `room_id`.
    #[must_use]
    pub fn has_conflict(
        &self,
        room_id: RoomId,
        slot: &TimeSlot,
        exclude: Option<BookingId>,
    ) -> bool {
        self.find_conflict(room_id, slot, exclude).is_some()
    }
}
