// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::interval::TimeSlot;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a database-assigned identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Parses an identifier from a text column.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::InvalidIdentifier` if the value is not an integer.
            pub fn parse(value: &str) -> Result<Self, DomainError> {
                value
                    .trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| DomainError::InvalidIdentifier {
                        field: $field,
                        value: value.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifies a room.
    RoomId,
    "room_id"
);
identifier!(
    /// Identifies a user.
    UserId,
    "user_id"
);
identifier!(
    /// Identifies a booking.
    BookingId,
    "booking_id"
);

/// Roles that gate booking workflow transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// May request bookings and cancel their own.
    #[default]
    Member,
    /// May additionally approve, reject and cancel any booking.
    Approver,
    /// May additionally manage rooms and run data loads.
    Admin,
}

impl UserRole {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "MEMBER",
            Self::Approver => "APPROVER",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns whether this role may review (approve or reject) bookings.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        matches!(self, Self::Approver | Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "USER" is how older data files spell the member role.
        match s.trim().to_uppercase().as_str() {
            "MEMBER" | "USER" => Ok(Self::Member),
            "APPROVER" => Ok(Self::Approver),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a user account may act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidAccountStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// Open for bookings.
    #[default]
    Active,
    /// Temporarily closed; new bookings are refused.
    Maintenance,
}

impl RoomStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "MAINTENANCE" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidRoomStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editable attributes of a room.
///
/// Used both to create a room and to replace an existing room's details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    /// Display name.
    pub name: String,
    /// Building / floor description.
    pub location: String,
    /// Number of seats. Must be positive.
    pub capacity: i64,
    /// Free-text equipment description.
    pub equipment: String,
    /// Optional picture of the room.
    pub image_url: Option<String>,
    /// Operational status.
    pub status: RoomStatus,
}

/// A bookable meeting room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub equipment: String,
    pub image_url: Option<String>,
    pub status: RoomStatus,
}

impl Room {
    /// Builds a room from its identifier and details.
    #[must_use]
    pub fn from_draft(room_id: RoomId, draft: RoomDraft) -> Self {
        Self {
            room_id,
            name: draft.name,
            location: draft.location,
            capacity: draft.capacity,
            equipment: draft.equipment,
            image_url: draft.image_url,
            status: draft.status,
        }
    }

    /// Returns whether the room currently accepts new bookings.
    #[must_use]
    pub const fn is_bookable(&self) -> bool {
        matches!(self.status, RoomStatus::Active)
    }
}

/// A member of the organisation.
///
/// `username` is the stable natural key used to reconcile imported records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Returns whether the account may take part in the booking workflow.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }
}

/// A reservation of one room by one user for a half-open time slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub requester_id: UserId,
    pub title: String,
    pub purpose: String,
    pub slot: TimeSlot,
    pub status: BookingStatus,
    /// Set when the booking is approved or rejected.
    pub approver_id: Option<UserId>,
    /// Set when the booking is approved or rejected.
    pub approved_at: Option<OffsetDateTime>,
    /// Immutable; default ordering key.
    pub created_at: OffsetDateTime,
}
