// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roombook_domain::{RoomId, UserId};
use time::OffsetDateTime;

/// A request to reserve a room, as data only.
///
/// Nothing here has been validated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// The room to reserve.
    pub room_id: RoomId,
    /// The user asking for the reservation.
    pub requester_id: UserId,
    /// Short title shown in listings.
    pub title: String,
    /// Free-text purpose.
    pub purpose: String,
    /// Requested start (inclusive).
    pub start: OffsetDateTime,
    /// Requested end (exclusive).
    pub end: OffsetDateTime,
}
