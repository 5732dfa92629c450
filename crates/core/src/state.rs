// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::notification::NotificationEvent;
use roombook_domain::{
    Booking, BookingId, BookingStatus, IntervalIndex, Room, RoomId, TimeSlot, UserId,
};
use time::OffsetDateTime;

/// A room together with the bookings currently recorded against it.
///
/// This is the snapshot a booking request is checked against. It is only
/// as fresh as the read that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSchedule {
    pub room: Room,
    pub bookings: Vec<Booking>,
}

impl RoomSchedule {
    #[must_use]
    pub const fn new(room: Room, bookings: Vec<Booking>) -> Self {
        Self { room, bookings }
    }

    /// Returns a conflict index over this schedule's bookings.
    #[must_use]
    pub fn index(&self) -> IntervalIndex<'_> {
        IntervalIndex::new(&self.bookings)
    }
}

/// A validated booking ready to be stored as `PENDING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPlan {
    pub room_id: RoomId,
    pub requester_id: UserId,
    pub title: String,
    pub purpose: String,
    pub slot: TimeSlot,
}

impl BookingPlan {
    /// The status every new booking starts in.
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        BookingStatus::Pending
    }
}

/// A validated status transition for one booking.
///
/// `from` is the status the decision was made against. Storage applies the
/// change only if the booking still has that status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub booking_id: BookingId,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub approver_id: Option<UserId>,
    pub approved_at: Option<OffsetDateTime>,
}

impl StatusChange {
    /// Returns the event to emit once this change commits, if any.
    ///
    /// Review decisions and withdrawal of a pending request notify.
    /// Cancelling an approved booking does not.
    #[must_use]
    pub const fn notification(&self) -> Option<NotificationEvent> {
        let notify: bool = self.to.is_review_decision()
            || matches!(
                (self.from, self.to),
                (BookingStatus::Pending, BookingStatus::Cancelled)
            );
        if notify {
            Some(NotificationEvent::status_update(self.booking_id))
        } else {
            None
        }
    }

    /// Returns `booking` with this change applied.
    #[must_use]
    pub fn applied_to(&self, booking: &Booking) -> Booking {
        Booking {
            status: self.to,
            approver_id: self.approver_id,
            approved_at: self.approved_at,
            ..booking.clone()
        }
    }
}
