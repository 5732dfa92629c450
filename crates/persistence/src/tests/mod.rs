// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use crate::{NewBooking, UserRecord};
use roombook::BookingPlan;
use roombook_domain::{
    AccountStatus, BookingStatus, RoomDraft, RoomId, RoomStatus, TimeSlot, UserId, UserRole,
};
use time::OffsetDateTime;
use time::macros::datetime;

/// A syntactically valid bcrypt hash, so tests skip the hashing cost.
pub const TEST_HASH: &str = "$2b$12$abcdefghijklmnopqrstuuMYcnzQm0Ulp8pVvQ8s0w5xWkUQeYQ1K";

pub fn at(hour: u8) -> OffsetDateTime {
    datetime!(2024-01-15 00:00 UTC).replace_hour(hour).unwrap()
}

pub fn create_test_slot(start_hour: u8, end_hour: u8) -> TimeSlot {
    TimeSlot::new(at(start_hour), at(end_hour)).unwrap()
}

pub fn create_test_room_draft(name: &str) -> RoomDraft {
    RoomDraft {
        name: name.to_string(),
        location: String::from("Floor 2"),
        capacity: 6,
        equipment: String::from("Whiteboard"),
        image_url: None,
        status: RoomStatus::Active,
    }
}

pub fn create_test_user_record(username: &str) -> UserRecord {
    UserRecord {
        username: username.to_string(),
        password_hash: TEST_HASH.to_string(),
        email: Some(format!("{username}@example.com")),
        full_name: format!("{username} tester"),
        role: UserRole::Member,
        status: AccountStatus::Active,
    }
}

pub fn create_test_plan(room_id: RoomId, requester_id: UserId, slot: TimeSlot) -> BookingPlan {
    BookingPlan {
        room_id,
        requester_id,
        title: String::from("Weekly sync"),
        purpose: String::from("Status"),
        slot,
    }
}

pub fn create_test_record(
    room_id: RoomId,
    requester_id: UserId,
    slot: TimeSlot,
    status: BookingStatus,
) -> NewBooking {
    NewBooking {
        room_id,
        requester_id,
        title: String::from("Imported"),
        purpose: String::new(),
        slot,
        status,
        approver_id: None,
        approved_at: None,
    }
}
