// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking listings and the dashboard summary.
//!
//! Storage narrows by room, user and status. Everything else, including
//! the joined display names, is filtered and sorted in the domain layer.

use roombook_domain::{
    Booking, BookingFilter, BookingSort, BookingStatus, BookingSummary, BookingView, Room,
    RoomId, SortDirection, SortKey, StatusFilter, UNKNOWN_ROOM_LABEL, User, UserId,
    query_bookings, summarize,
};
use roombook_persistence::{BookingQuery, BookingRepository};
use std::collections::HashMap;

use crate::auth::AuthorizationService;
use crate::error::{ApiError, translate_persistence_error};

/// Label used for bookings whose requester no longer exists.
pub const UNKNOWN_USER_LABEL: &str = "Unknown user";

/// Joins bookings with room and requester names.
fn join_views(bookings: Vec<Booking>, rooms: &[Room], users: &[User]) -> Vec<BookingView> {
    let room_names: HashMap<RoomId, &str> = rooms
        .iter()
        .map(|room| (room.room_id, room.name.as_str()))
        .collect();
    let user_names: HashMap<UserId, &str> = users
        .iter()
        .map(|user| (user.user_id, user.full_name.as_str()))
        .collect();

    bookings
        .into_iter()
        .map(|booking| {
            let room_name: String = room_names
                .get(&booking.room_id)
                .copied()
                .unwrap_or(UNKNOWN_ROOM_LABEL)
                .to_string();
            let requester_name: String = user_names
                .get(&booking.requester_id)
                .copied()
                .unwrap_or(UNKNOWN_USER_LABEL)
                .to_string();
            BookingView {
                booking,
                room_name,
                requester_name,
            }
        })
        .collect()
}

/// Lists bookings matching `filter`, ordered by `sort`.
///
/// # Errors
///
/// Returns an error if a repository call fails.
pub async fn list_bookings(
    repository: &dyn BookingRepository,
    filter: &BookingFilter,
    sort: BookingSort,
) -> Result<Vec<BookingView>, ApiError> {
    let query: BookingQuery = BookingQuery {
        room_id: filter.room_id,
        user_id: filter.user_id,
        status: filter.status.status(),
    };
    let bookings: Vec<Booking> = repository
        .list_bookings(&query)
        .await
        .map_err(translate_persistence_error)?;
    let rooms: Vec<Room> = repository
        .list_rooms()
        .await
        .map_err(translate_persistence_error)?;
    let users: Vec<User> = repository
        .list_users()
        .await
        .map_err(translate_persistence_error)?;

    let views: Vec<BookingView> = join_views(bookings, &rooms, &users);
    Ok(query_bookings(views, filter, sort))
}

/// Lists one user's own bookings, most recent first.
///
/// # Errors
///
/// Returns an error if a repository call fails.
pub async fn my_bookings(
    repository: &dyn BookingRepository,
    user_id: UserId,
    status: StatusFilter,
) -> Result<Vec<BookingView>, ApiError> {
    let filter: BookingFilter = BookingFilter {
        status,
        user_id: Some(user_id),
        ..BookingFilter::default()
    };
    list_bookings(repository, &filter, BookingSort::default()).await
}

/// Lists bookings awaiting review, soonest first.
///
/// # Errors
///
/// Returns an error if the actor may not review bookings or a repository
/// call fails.
pub async fn pending_approvals(
    repository: &dyn BookingRepository,
    actor: &User,
) -> Result<Vec<BookingView>, ApiError> {
    AuthorizationService::authorize_review_queue(actor)?;

    let filter: BookingFilter = BookingFilter {
        status: StatusFilter::Only(BookingStatus::Pending),
        ..BookingFilter::default()
    };
    let sort: BookingSort = BookingSort {
        key: SortKey::StartTime,
        direction: SortDirection::Ascending,
    };
    list_bookings(repository, &filter, sort).await
}

/// Computes the dashboard summary over every booking.
///
/// # Errors
///
/// Returns an error if a repository call fails.
pub async fn dashboard_summary(
    repository: &dyn BookingRepository,
) -> Result<BookingSummary, ApiError> {
    let bookings: Vec<Booking> = repository
        .list_bookings(&BookingQuery::default())
        .await
        .map_err(translate_persistence_error)?;
    let rooms: Vec<Room> = repository
        .list_rooms()
        .await
        .map_err(translate_persistence_error)?;
    Ok(summarize(&bookings, &rooms))
}
