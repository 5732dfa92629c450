// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the room booking engine.
//!
//! Every operation takes a `&dyn BookingRepository`, so the same code runs
//! against the `SQLite` adapter and against test doubles. Lower-layer
//! errors are translated into `ApiError` here and nowhere else.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod export;
mod import;
mod listing;
mod notification;
mod request_response;
mod rooms;
mod workflow;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationService, resolve_actor};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use export::{export_bookings_csv, export_csv, export_users_csv};
pub use import::{
    BOOKING_REQUIRED_COLUMNS, BookingImportRecord, CsvRow, ImportOptions, ImportPreview,
    ImportResult, ImportRowError, PreviewRow, RecordKind, RowStatus, USER_REQUIRED_COLUMNS,
    UserImportRecord, import_bookings, import_csv, import_template, import_users, parse_csv,
    preview_import,
};
pub use listing::{
    UNKNOWN_USER_LABEL, dashboard_summary, list_bookings, my_bookings, pending_approvals,
};
pub use notification::{
    LoggingDispatcher, NotificationDispatcher, NotificationError, spawn_dispatch,
};
pub use request_response::{
    BookingListItem, BookingResponse, CreateBookingRequest, DashboardResponse,
    ListBookingsRequest, RoomRequest, RoomResponse, RoomUsageResponse, SetStatusRequest,
    UserResponse,
};
pub use rooms::{create_room, delete_room, list_rooms, update_room};
pub use workflow::{create_booking, set_booking_status};
