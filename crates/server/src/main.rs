// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::{Parser, ValueEnum};
use roombook_api::{
    ApiError, AuthorizationService, BookingListItem, BookingResponse, CreateBookingRequest,
    DashboardResponse, ImportOptions, ImportPreview, ImportResult, ListBookingsRequest,
    NotificationDispatcher, RecordKind, RoomRequest, RoomResponse, SetStatusRequest,
    create_booking, create_room, dashboard_summary, delete_room, export_csv, import_csv,
    import_template, list_bookings, list_rooms, my_bookings, pending_approvals, preview_import,
    resolve_actor, set_booking_status, update_room,
};
use roombook_domain::{
    Booking, BookingFilter, BookingId, BookingSort, BookingSummary, BookingView, Room, RoomDraft,
    RoomId, StatusFilter, User, UserId,
};
use roombook_persistence::{BookingRepository, Persistence};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::live::{LiveFeed, LiveFeedDispatcher, live_events_handler};

/// Meeting room booking server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Whether CSV booking imports are checked against existing bookings
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Enforce)]
    import_conflict_policy: ConflictPolicy,
}

/// How imported bookings are checked for slot conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConflictPolicy {
    /// Reject rows that overlap a PENDING or APPROVED booking.
    Enforce,
    /// Insert rows as given, for trusted historical loads.
    Bypass,
}

impl ConflictPolicy {
    const fn import_options(self) -> ImportOptions {
        ImportOptions {
            bypass_conflicts: matches!(self, Self::Bypass),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The booking repository.
    repository: Arc<dyn BookingRepository>,
    /// Receives booking notifications after each committed change.
    dispatcher: Arc<dyn NotificationDispatcher>,
    /// The live feed served on `/live`.
    live: Arc<LiveFeed>,
    /// Applied to every booking import.
    import_options: ImportOptions,
}

impl AppState {
    fn new(repository: Arc<dyn BookingRepository>, import_options: ImportOptions) -> Self {
        let live: Arc<LiveFeed> = Arc::new(LiveFeed::new());
        let dispatcher: Arc<dyn NotificationDispatcher> =
            Arc::new(LiveFeedDispatcher::new(Arc::clone(&live)));
        Self {
            repository,
            dispatcher,
            live,
            import_options,
        }
    }
}

/// Identifies the user acting on a request.
#[derive(Debug, Deserialize)]
struct ActorQuery {
    actor_id: i64,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Whether the same request may succeed if retried.
    retryable: bool,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
    retryable: bool,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            retryable: self.retryable,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } | ApiError::InvalidCsvFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::PersistenceFailure { .. } => {
                error!(error = %err, "Persistence failure");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            retryable: err.is_retryable(),
            message: err.to_string(),
        }
    }
}

/// Resolves `actor_id` and checks the actor may import or export data.
async fn resolve_data_manager(app_state: &AppState, actor_id: i64) -> Result<User, HttpError> {
    let actor: User = resolve_actor(&*app_state.repository, UserId::new(actor_id)).await?;
    AuthorizationService::authorize_data_management(&actor).map_err(ApiError::from)?;
    Ok(actor)
}

/// Builds a CSV download response.
fn csv_response(body: String, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Handler for GET `/rooms`.
async fn handle_list_rooms(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<RoomResponse>>, HttpError> {
    let rooms: Vec<Room> = list_rooms(&*app_state.repository).await?;
    Ok(Json(rooms.iter().map(RoomResponse::from).collect()))
}

/// Handler for POST `/rooms`.
async fn handle_create_room(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), HttpError> {
    info!(actor_id = req.actor_id, name = %req.name, "Handling create_room request");

    let actor: User = resolve_actor(&*app_state.repository, UserId::new(req.actor_id)).await?;
    let draft: RoomDraft = req.to_draft()?;
    let room: Room = create_room(&*app_state.repository, &actor, &draft).await?;

    Ok((StatusCode::CREATED, Json(RoomResponse::from(&room))))
}

/// Handler for PUT `/rooms/{room_id}`.
async fn handle_update_room(
    AxumState(app_state): AxumState<AppState>,
    Path(room_id): Path<i64>,
    Json(req): Json<RoomRequest>,
) -> Result<Json<RoomResponse>, HttpError> {
    info!(actor_id = req.actor_id, room_id, "Handling update_room request");

    let actor: User = resolve_actor(&*app_state.repository, UserId::new(req.actor_id)).await?;
    let draft: RoomDraft = req.to_draft()?;
    let room: Room =
        update_room(&*app_state.repository, &actor, RoomId::new(room_id), &draft).await?;

    Ok(Json(RoomResponse::from(&room)))
}

/// Handler for DELETE `/rooms/{room_id}`.
async fn handle_delete_room(
    AxumState(app_state): AxumState<AppState>,
    Path(room_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<StatusCode, HttpError> {
    info!(actor_id = query.actor_id, room_id, "Handling delete_room request");

    let actor: User = resolve_actor(&*app_state.repository, UserId::new(query.actor_id)).await?;
    delete_room(&*app_state.repository, &actor, RoomId::new(room_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/bookings`.
///
/// Every query parameter is optional; see `ListBookingsRequest`.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    Query(req): Query<ListBookingsRequest>,
) -> Result<Json<Vec<BookingListItem>>, HttpError> {
    let (filter, sort): (BookingFilter, BookingSort) = req.to_query()?;
    let views: Vec<BookingView> = list_bookings(&*app_state.repository, &filter, sort).await?;
    Ok(Json(views.iter().map(BookingListItem::from).collect()))
}

/// Handler for GET `/users/{user_id}/bookings`.
async fn handle_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BookingListItem>>, HttpError> {
    let views: Vec<BookingView> =
        my_bookings(&*app_state.repository, UserId::new(user_id), StatusFilter::All).await?;
    Ok(Json(views.iter().map(BookingListItem::from).collect()))
}

/// Handler for POST `/bookings`.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), HttpError> {
    info!(
        room_id = req.room_id,
        requester_id = req.requester_id,
        start = %req.start_datetime,
        end = %req.end_datetime,
        "Handling create_booking request"
    );

    let booking: Booking =
        create_booking(&*app_state.repository, &app_state.dispatcher, req).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(&booking))))
}

/// Handler for POST `/bookings/{booking_id}/status`.
async fn handle_set_status(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<BookingResponse>, HttpError> {
    info!(
        booking_id,
        actor_id = req.actor_id,
        status = %req.status,
        "Handling set_status request"
    );

    let booking: Booking = set_booking_status(
        &*app_state.repository,
        &app_state.dispatcher,
        BookingId::new(booking_id),
        UserId::new(req.actor_id),
        req.target()?,
    )
    .await?;

    Ok(Json(BookingResponse::from(&booking)))
}

/// Handler for GET `/approvals`.
async fn handle_pending_approvals(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<BookingListItem>>, HttpError> {
    let actor: User = resolve_actor(&*app_state.repository, UserId::new(query.actor_id)).await?;
    let views: Vec<BookingView> = pending_approvals(&*app_state.repository, &actor).await?;
    Ok(Json(views.iter().map(BookingListItem::from).collect()))
}

/// Handler for GET `/dashboard`.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<DashboardResponse>, HttpError> {
    let summary: BookingSummary = dashboard_summary(&*app_state.repository).await?;
    Ok(Json(DashboardResponse::from(&summary)))
}

/// Handler for POST `/import/{kind}`.
///
/// The request body is the CSV text. Row failures are reported in the
/// response; only an unreadable batch fails the request.
async fn handle_import(
    AxumState(app_state): AxumState<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ActorQuery>,
    body: String,
) -> Result<Json<ImportResult>, HttpError> {
    let kind: RecordKind = kind.parse()?;
    let actor: User = resolve_data_manager(&app_state, query.actor_id).await?;
    info!(%kind, actor = %actor.username, bytes = body.len(), "Handling import request");

    let result: ImportResult =
        import_csv(&*app_state.repository, kind, &body, app_state.import_options).await?;
    if result.failed_count > 0 {
        warn!(
            %kind,
            success = result.success_count,
            failed = result.failed_count,
            "Import finished with row failures"
        );
    }

    Ok(Json(result))
}

/// Handler for POST `/import/{kind}/preview`.
async fn handle_import_preview(
    AxumState(app_state): AxumState<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ActorQuery>,
    body: String,
) -> Result<Json<ImportPreview>, HttpError> {
    let kind: RecordKind = kind.parse()?;
    resolve_data_manager(&app_state, query.actor_id).await?;
    Ok(Json(preview_import(kind, &body)?))
}

/// Handler for GET `/export/{kind}`.
async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Result<Response, HttpError> {
    let kind: RecordKind = kind.parse()?;
    let actor: User = resolve_data_manager(&app_state, query.actor_id).await?;
    info!(%kind, actor = %actor.username, "Handling export request");

    let csv: String = export_csv(&*app_state.repository, kind).await?;
    Ok(csv_response(csv, &format!("{kind}.csv")))
}

/// Handler for GET `/templates/{kind}`.
async fn handle_template(Path(kind): Path<String>) -> Result<Response, HttpError> {
    let kind: RecordKind = kind.parse()?;
    Ok(csv_response(
        import_template(kind).to_string(),
        &format!("{kind}_template.csv"),
    ))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/rooms", get(handle_list_rooms).post(handle_create_room))
        .route(
            "/rooms/{room_id}",
            put(handle_update_room).delete(handle_delete_room),
        )
        .route(
            "/bookings",
            get(handle_list_bookings).post(handle_create_booking),
        )
        .route("/bookings/{booking_id}/status", post(handle_set_status))
        .route("/users/{user_id}/bookings", get(handle_my_bookings))
        .route("/approvals", get(handle_pending_approvals))
        .route("/dashboard", get(handle_dashboard))
        .route("/import/{kind}", post(handle_import))
        .route("/import/{kind}/preview", post(handle_import_preview))
        .route("/export/{kind}", get(handle_export))
        .route("/templates/{kind}", get(handle_template))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing room booking server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let import_options: ImportOptions = args.import_conflict_policy.import_options();
    if import_options.bypass_conflicts {
        warn!("Booking imports will not be checked for conflicts");
    }

    let app_state: AppState = AppState::new(Arc::new(persistence), import_options);
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
