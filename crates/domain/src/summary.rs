// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::types::{Booking, Room, RoomId};
use std::collections::HashMap;

/// Number of rooms reported in the usage ranking.
pub const TOP_ROOMS_LIMIT: usize = 5;

/// Label used for bookings whose room no longer exists.
pub const UNKNOWN_ROOM_LABEL: &str = "Unknown room";

/// Booking count for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUsage {
    pub room_name: String,
    pub booking_count: usize,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookingSummary {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    /// At most `TOP_ROOMS_LIMIT` entries, busiest first, ties by name.
    pub top_rooms: Vec<RoomUsage>,
}

/// Computes the dashboard summary.
///
/// Bookings referencing a deleted room are counted together under
/// `UNKNOWN_ROOM_LABEL`.
#[must_use]
pub fn summarize(bookings: &[Booking], rooms: &[Room]) -> BookingSummary {
    let names: HashMap<RoomId, &str> = rooms
        .iter()
        .map(|room| (room.room_id, room.name.as_str()))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for booking in bookings {
        let name: &str = names
            .get(&booking.room_id)
            .copied()
            .unwrap_or(UNKNOWN_ROOM_LABEL);
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut top_rooms: Vec<RoomUsage> = counts
        .into_iter()
        .map(|(room_name, booking_count)| RoomUsage {
            room_name: room_name.to_string(),
            booking_count,
        })
        .collect();
    top_rooms.sort_by(|a, b| {
        b.booking_count
            .cmp(&a.booking_count)
            .then_with(|| a.room_name.cmp(&b.room_name))
    });
    top_rooms.truncate(TOP_ROOMS_LIMIT);

    BookingSummary {
        total_bookings: bookings.len(),
        pending_bookings: bookings
            .iter()
            .filter(|booking| booking.status == BookingStatus::Pending)
            .count(),
        top_rooms,
    }
}
