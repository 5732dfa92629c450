// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Booking, BookingId, BookingStatus, BookingView, Room, RoomId, RoomStatus, TimeSlot, UserId,
};
use time::OffsetDateTime;
use time::macros::datetime;

/// 2024-01-15 at the given hour and minute, UTC.
pub fn at(hour: u8, minute: u8) -> OffsetDateTime {
    datetime!(2024-01-15 00:00 UTC)
        .replace_hour(hour)
        .unwrap()
        .replace_minute(minute)
        .unwrap()
}

pub fn create_test_slot(start: OffsetDateTime, end: OffsetDateTime) -> TimeSlot {
    TimeSlot::new(start, end).unwrap()
}

pub fn create_test_booking(
    booking_id: i64,
    room_id: i64,
    requester_id: i64,
    slot: TimeSlot,
    status: BookingStatus,
) -> Booking {
    Booking {
        booking_id: BookingId::new(booking_id),
        room_id: RoomId::new(room_id),
        requester_id: UserId::new(requester_id),
        title: format!("Booking {booking_id}"),
        purpose: String::new(),
        slot,
        status,
        approver_id: None,
        approved_at: None,
        created_at: datetime!(2024-01-01 08:00 UTC) + time::Duration::minutes(booking_id),
    }
}

pub fn create_test_room(room_id: i64, name: &str) -> Room {
    Room {
        room_id: RoomId::new(room_id),
        name: name.to_string(),
        location: String::from("Floor 1"),
        capacity: 8,
        equipment: String::from("Projector"),
        image_url: None,
        status: RoomStatus::Active,
    }
}

pub fn create_test_view(booking: Booking, room_name: &str, requester_name: &str) -> BookingView {
    BookingView {
        booking,
        room_name: room_name.to_string(),
        requester_name: requester_name.to_string(),
    }
}
