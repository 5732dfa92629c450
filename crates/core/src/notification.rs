// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roombook_domain::BookingId;
use serde::{Deserialize, Serialize};

/// What happened to the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewBooking,
    BookingStatusUpdate,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewBooking => "NEW_BOOKING",
            Self::BookingStatusUpdate => "BOOKING_STATUS_UPDATE",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event handed to the notification side channel after a change commits.
///
/// Serializes as `{"type": "NEW_BOOKING", "bookingId": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(rename = "bookingId")]
    pub booking_id: BookingId,
}

impl NotificationEvent {
    #[must_use]
    pub const fn new_booking(booking_id: BookingId) -> Self {
        Self {
            kind: NotificationKind::NewBooking,
            booking_id,
        }
    }

    #[must_use]
    pub const fn status_update(booking_id: BookingId) -> Self {
        Self {
            kind: NotificationKind::BookingStatusUpdate,
            booking_id,
        }
    }
}
