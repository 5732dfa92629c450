// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or blank.
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
    /// A time interval does not satisfy `start < end`.
    InvalidInterval {
        /// The interval start, formatted for display.
        start: String,
        /// The interval end, formatted for display.
        end: String,
    },
    /// Room capacity must be positive.
    InvalidCapacity(i64),
    /// Role value is not one of the recognised roles.
    InvalidRole(String),
    /// Account status value is not recognised.
    InvalidAccountStatus(String),
    /// Room status value is not recognised.
    InvalidRoomStatus(String),
    /// Booking status value is not recognised.
    InvalidBookingStatus(String),
    /// A timestamp could not be parsed.
    InvalidTimestamp {
        /// The field holding the timestamp.
        field: &'static str,
        /// The raw value.
        value: String,
    },
    /// An identifier could not be parsed.
    InvalidIdentifier {
        /// The field holding the identifier.
        field: &'static str,
        /// The raw value.
        value: String,
    },
    /// A booking status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// The room is not accepting bookings.
    RoomUnavailable {
        /// The room identifier.
        room_id: i64,
    },
}

impl DomainError {
    /// Returns the input field this error refers to, if any.
    ///
    /// Used by the API layer to report field-specific validation failures.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::InvalidTimestamp { field, .. }
            | Self::InvalidIdentifier { field, .. } => field,
            Self::InvalidInterval { .. } => "end_datetime",
            Self::InvalidCapacity(_) => "capacity",
            Self::InvalidRole(_) => "role",
            Self::InvalidAccountStatus(_)
            | Self::InvalidRoomStatus(_)
            | Self::InvalidBookingStatus(_)
            | Self::InvalidStatusTransition { .. } => "status",
            Self::RoomUnavailable { .. } => "room_id",
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::InvalidInterval { start, end } => {
                write!(f, "start ({start}) must be before end ({end})")
            }
            Self::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {capacity}. Must be greater than 0")
            }
            Self::InvalidRole(value) => write!(
                f,
                "Invalid role '{value}' (must be MEMBER, APPROVER, or ADMIN)"
            ),
            Self::InvalidAccountStatus(value) => write!(
                f,
                "Invalid account status '{value}' (must be ACTIVE or INACTIVE)"
            ),
            Self::InvalidRoomStatus(value) => write!(
                f,
                "Invalid room status '{value}' (must be ACTIVE or MAINTENANCE)"
            ),
            Self::InvalidBookingStatus(value) => write!(
                f,
                "Invalid booking status '{value}' (must be PENDING, APPROVED, REJECTED, or CANCELLED)"
            ),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "{field}: '{value}' is not an ISO-8601 timestamp")
            }
            Self::InvalidIdentifier { field, value } => {
                write!(f, "{field}: '{value}' is not a valid identifier")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot change booking status from {from} to {to}: {reason}")
            }
            Self::RoomUnavailable { room_id } => {
                write!(f, "Room {room_id} is under maintenance and cannot be booked")
            }
        }
    }
}

impl std::error::Error for DomainError {}
