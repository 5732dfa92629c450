// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps cross this boundary as ISO-8601 strings and identifiers as
//! plain integers.

use roombook_domain::{
    AccountStatus, Booking, BookingFilter, BookingSort, BookingStatus, BookingSummary,
    BookingView, Room, RoomDraft, RoomId, RoomStatus, RoomUsage, SortDirection, SortKey,
    StatusFilter, User, UserId, UserRole, format_timestamp,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, translate_domain_error};

/// API request to reserve a room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: i64,
    /// The user the booking is for. Bookings are self-service.
    pub requester_id: i64,
    pub title: String,
    #[serde(default)]
    pub purpose: String,
    /// Inclusive start, ISO-8601.
    pub start_datetime: String,
    /// Exclusive end, ISO-8601.
    pub end_datetime: String,
}

/// API request to move a booking to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetStatusRequest {
    /// The user performing the change.
    pub actor_id: i64,
    /// `APPROVED`, `REJECTED`, or `CANCELLED`.
    pub status: String,
}

impl SetStatusRequest {
    /// Parses the target status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the status is not recognised.
    pub fn target(&self) -> Result<BookingStatus, ApiError> {
        self.status
            .parse::<BookingStatus>()
            .map_err(translate_domain_error)
    }
}

/// API request to create or replace a room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomRequest {
    /// The admin performing the change.
    pub actor_id: i64,
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub capacity: i64,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// `ACTIVE` (default) or `MAINTENANCE`.
    #[serde(default)]
    pub status: Option<String>,
}

impl RoomRequest {
    /// Converts the request into a room draft.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the status is not recognised.
    pub fn to_draft(&self) -> Result<RoomDraft, ApiError> {
        let status: RoomStatus = match self.status.as_deref().map(str::trim) {
            None | Some("") => RoomStatus::default(),
            Some(value) => value.parse().map_err(translate_domain_error)?,
        };
        Ok(RoomDraft {
            name: self.name.trim().to_string(),
            location: self.location.trim().to_string(),
            capacity: self.capacity,
            equipment: self.equipment.trim().to_string(),
            image_url: self
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            status,
        })
    }
}

/// Query parameters for a booking listing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListBookingsRequest {
    /// A booking status, or `ALL`.
    pub status: Option<String>,
    pub room_id: Option<i64>,
    pub user_id: Option<i64>,
    pub search: Option<String>,
    /// Sort key, e.g. `created_at`, `start_datetime`, `room_name`.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
}

impl ListBookingsRequest {
    /// Parses the filter and sort order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the status, sort key, or direction is not
    /// recognised.
    pub fn to_query(&self) -> Result<(BookingFilter, BookingSort), ApiError> {
        let status: StatusFilter = match self.status.as_deref() {
            Some(value) => value.parse().map_err(translate_domain_error)?,
            None => StatusFilter::All,
        };
        let key: SortKey = match self.sort.as_deref() {
            Some(value) => value.parse().map_err(translate_domain_error)?,
            None => SortKey::default(),
        };
        let direction: SortDirection = match self.direction.as_deref() {
            Some(value) => value.parse().map_err(translate_domain_error)?,
            None => SortDirection::default(),
        };

        let filter: BookingFilter = BookingFilter {
            status,
            room_id: self.room_id.map(RoomId::new),
            user_id: self.user_id.map(UserId::new),
            search: self.search.clone(),
        };
        Ok((filter, BookingSort { key, direction }))
    }
}

/// A booking as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub title: String,
    pub purpose: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub status: BookingStatus,
    pub approver_id: Option<i64>,
    pub approved_at: Option<String>,
    pub created_at: String,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.booking_id.value(),
            room_id: booking.room_id.value(),
            user_id: booking.requester_id.value(),
            title: booking.title.clone(),
            purpose: booking.purpose.clone(),
            start_datetime: format_timestamp(booking.slot.start()),
            end_datetime: format_timestamp(booking.slot.end()),
            status: booking.status,
            approver_id: booking.approver_id.map(|id| id.value()),
            approved_at: booking.approved_at.map(format_timestamp),
            created_at: format_timestamp(booking.created_at),
        }
    }
}

/// A booking listing entry, with the joined display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingListItem {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub room_name: String,
    pub requester_name: String,
}

impl From<&BookingView> for BookingListItem {
    fn from(view: &BookingView) -> Self {
        Self {
            booking: BookingResponse::from(&view.booking),
            room_name: view.room_name.clone(),
            requester_name: view.requester_name.clone(),
        }
    }
}

/// A room as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room_id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub equipment: String,
    pub image_url: Option<String>,
    pub status: RoomStatus,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.room_id.value(),
            name: room.name.clone(),
            location: room.location.clone(),
            capacity: room.capacity,
            equipment: room.equipment.clone(),
            image_url: room.image_url.clone(),
            status: room.status,
        }
    }
}

/// A user as returned by the API. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.value(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            created_at: format_timestamp(user.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUsageResponse {
    pub room_name: String,
    pub booking_count: usize,
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub top_rooms: Vec<RoomUsageResponse>,
}

impl From<&BookingSummary> for DashboardResponse {
    fn from(summary: &BookingSummary) -> Self {
        Self {
            total_bookings: summary.total_bookings,
            pending_bookings: summary.pending_bookings,
            top_rooms: summary
                .top_rooms
                .iter()
                .map(|usage: &RoomUsage| RoomUsageResponse {
                    room_name: usage.room_name.clone(),
                    booking_count: usage.booking_count,
                })
                .collect(),
        }
    }
}
