// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deterministic filtering and sorting of booking lists.
//!
//! Listings are fetched from storage, joined with room and requester
//! names, then narrowed and ordered here so list semantics do not depend
//! on what the storage layer can express.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::types::{Booking, RoomId, UserId};
use std::cmp::Ordering;
use std::str::FromStr;

/// A booking joined with the display names needed for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking: Booking,
    /// Name of the booked room, or a placeholder if the room is gone.
    pub room_name: String,
    /// Full name of the requester.
    pub requester_name: String,
}

/// Status predicate. `All` applies no restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(&self, status: BookingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }

    /// Returns the single status this filter selects, if any.
    #[must_use]
    pub const fn status(&self) -> Option<BookingStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(*status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("ALL") {
            return Ok(Self::All);
        }
        trimmed.parse::<BookingStatus>().map(Self::Only)
    }
}

/// Predicates over a booking listing. All set predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: StatusFilter,
    pub room_id: Option<RoomId>,
    pub user_id: Option<UserId>,
    /// Case-insensitive substring matched against title, requester name and room name.
    pub search: Option<String>,
}

impl BookingFilter {
    /// Returns true if the view satisfies every predicate.
    #[must_use]
    pub fn matches(&self, view: &BookingView) -> bool {
        if !self.status.matches(view.booking.status) {
            return false;
        }
        if self.room_id.is_some_and(|room_id| room_id != view.booking.room_id) {
            return false;
        }
        if self
            .user_id
            .is_some_and(|user_id| user_id != view.booking.requester_id)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle: String = needle.to_lowercase();
                view.booking.title.to_lowercase().contains(&needle)
                    || view.requester_name.to_lowercase().contains(&needle)
                    || view.room_name.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Listing sort keys. `RoomName` and `RequesterName` come from the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    StartTime,
    EndTime,
    Title,
    Status,
    RoomName,
    RequesterName,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::StartTime => "start_datetime",
            Self::EndTime => "end_datetime",
            Self::Title => "title",
            Self::Status => "status",
            Self::RoomName => "room_name",
            Self::RequesterName => "requester_name",
        }
    }

    fn compare(self, a: &BookingView, b: &BookingView) -> Ordering {
        match self {
            Self::CreatedAt => a.booking.created_at.cmp(&b.booking.created_at),
            Self::StartTime => a.booking.slot.start().cmp(&b.booking.slot.start()),
            Self::EndTime => a.booking.slot.end().cmp(&b.booking.slot.end()),
            Self::Title => compare_text(&a.booking.title, &b.booking.title),
            Self::Status => a.booking.status.as_str().cmp(b.booking.status.as_str()),
            Self::RoomName => compare_text(&a.room_name, &b.room_name),
            Self::RequesterName => compare_text(&a.requester_name, &b.requester_name),
        }
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created_at" => Ok(Self::CreatedAt),
            "start_datetime" | "start" => Ok(Self::StartTime),
            "end_datetime" | "end" => Ok(Self::EndTime),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "room_name" | "room" => Ok(Self::RoomName),
            "requester_name" | "user_full_name" | "requester" => Ok(Self::RequesterName),
            _ => Err(DomainError::InvalidIdentifier {
                field: "sort",
                value: s.to_string(),
            }),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(DomainError::InvalidIdentifier {
                field: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// A single sort key and its direction. Defaults to most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Keeps only the views matching `filter`, preserving order.
#[must_use]
pub fn apply_filter(views: Vec<BookingView>, filter: &BookingFilter) -> Vec<BookingView> {
    views.into_iter().filter(|view| filter.matches(view)).collect()
}

/// Sorts views in place.
///
/// The sort is stable in both directions: equal keys keep their prior
/// relative order.
pub fn sort_views(views: &mut [BookingView], sort: BookingSort) {
    match sort.direction {
        SortDirection::Ascending => views.sort_by(|a, b| sort.key.compare(a, b)),
        SortDirection::Descending => views.sort_by(|a, b| sort.key.compare(b, a)),
    }
}

/// Filters, then sorts.
#[must_use]
pub fn query_bookings(
    views: Vec<BookingView>,
    filter: &BookingFilter,
    sort: BookingSort,
) -> Vec<BookingView> {
    let mut selected: Vec<BookingView> = apply_filter(views, filter);
    sort_views(&mut selected, sort);
    selected
}
