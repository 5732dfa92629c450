// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roombook_domain::{DomainError, RoomId};

/// Errors that can occur while planning a workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The requested slot overlaps a booking that still holds the room.
    Conflict {
        /// The contested room.
        room_id: RoomId,
    },
    /// The actor may not perform the action.
    Unauthorized {
        /// The attempted action.
        action: &'static str,
        /// Why it was refused.
        reason: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Conflict { room_id } => write!(
                f,
                "Room {room_id} is already booked for part of the requested time"
            ),
            Self::Unauthorized { action, reason } => {
                write!(f, "Not authorized to {action}: {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
