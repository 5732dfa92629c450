// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingRequest, RoomSchedule};
use roombook_domain::{
    AccountStatus, Booking, BookingId, BookingStatus, Room, RoomId, RoomStatus, TimeSlot, User,
    UserId, UserRole,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn at(hour: u8) -> OffsetDateTime {
    datetime!(2024-01-15 00:00 UTC).replace_hour(hour).unwrap()
}

pub fn half_past(hour: u8) -> OffsetDateTime {
    at(hour).replace_minute(30).unwrap()
}

pub fn now() -> OffsetDateTime {
    datetime!(2024-01-10 12:00 UTC)
}

pub fn create_test_user(user_id: i64, role: UserRole) -> User {
    User {
        user_id: UserId::new(user_id),
        username: format!("user{user_id}"),
        full_name: format!("User {user_id}"),
        email: None,
        role,
        status: AccountStatus::Active,
        created_at: datetime!(2024-01-01 00:00 UTC),
    }
}

pub fn create_test_room() -> Room {
    Room {
        room_id: RoomId::new(1),
        name: String::from("Everest"),
        location: String::from("Floor 3"),
        capacity: 10,
        equipment: String::from("Projector"),
        image_url: None,
        status: RoomStatus::Active,
    }
}

pub fn create_test_booking(
    booking_id: i64,
    requester_id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
    status: BookingStatus,
) -> Booking {
    Booking {
        booking_id: BookingId::new(booking_id),
        room_id: RoomId::new(1),
        requester_id: UserId::new(requester_id),
        title: String::from("Planning"),
        purpose: String::new(),
        slot: TimeSlot::new(start, end).unwrap(),
        status,
        approver_id: None,
        approved_at: None,
        created_at: datetime!(2024-01-02 00:00 UTC),
    }
}

pub fn create_test_schedule(bookings: Vec<Booking>) -> RoomSchedule {
    RoomSchedule::new(create_test_room(), bookings)
}

pub fn create_test_request(start: OffsetDateTime, end: OffsetDateTime) -> BookingRequest {
    BookingRequest {
        room_id: RoomId::new(1),
        requester_id: UserId::new(2),
        title: String::from("Design review"),
        purpose: String::from("  Walk through the new layout "),
        start,
        end,
    }
}
