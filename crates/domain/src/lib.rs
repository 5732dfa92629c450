// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking_status;
mod error;
mod interval;
mod query;
mod summary;
mod timestamp;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking_status::BookingStatus;
pub use interval::{IntervalIndex, TimeSlot};
pub use query::{
    BookingFilter, BookingSort, BookingView, SortDirection, SortKey, StatusFilter, apply_filter,
    query_bookings, sort_views,
};
pub use summary::{BookingSummary, RoomUsage, TOP_ROOMS_LIMIT, UNKNOWN_ROOM_LABEL, summarize};
pub use timestamp::{format_timestamp, parse_timestamp};

// Re-export public types
pub use error::DomainError;
pub use types::{
    AccountStatus, Booking, BookingId, Room, RoomDraft, RoomId, RoomStatus, User, UserId, UserRole,
};
pub use validation::{
    require_text, validate_booking_fields, validate_room_draft, validate_user_fields,
};
