// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use roombook_domain::{AccountStatus, RoomStatus, UserRole};
use roombook_persistence::UserRecord;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::live::LiveEvent;

const TEST_HASH: &str = "$2b$12$abcdefghijklmnopqrstuuMYcnzQm0Ulp8pVvQ8s0w5xWkUQeYQ1K";

struct TestApp {
    state: AppState,
    router: Router,
    admin: User,
    member: User,
    approver: User,
    room: Room,
}

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state(import_options: ImportOptions) -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(Arc::new(persistence), import_options)
}

async fn create_test_user(state: &AppState, username: &str, role: UserRole) -> User {
    let record: UserRecord = UserRecord {
        username: username.to_string(),
        password_hash: TEST_HASH.to_string(),
        email: None,
        full_name: format!("{username} tester"),
        role,
        status: AccountStatus::Active,
    };
    state
        .repository
        .upsert_user_by_username(&record)
        .await
        .expect("user")
        .0
}

async fn create_test_app(import_options: ImportOptions) -> TestApp {
    let state: AppState = create_test_app_state(import_options);
    let admin: User = create_test_user(&state, "root", UserRole::Admin).await;
    let member: User = create_test_user(&state, "alice", UserRole::Member).await;
    let approver: User = create_test_user(&state, "bob", UserRole::Approver).await;
    let room: Room = state
        .repository
        .create_room(&RoomDraft {
            name: String::from("Orchid"),
            location: String::from("Floor 3"),
            capacity: 8,
            equipment: String::from("Projector"),
            image_url: None,
            status: RoomStatus::Active,
        })
        .await
        .expect("room");
    TestApp {
        router: build_router(state.clone()),
        state,
        admin,
        member,
        approver,
        room,
    }
}

fn create_test_booking_body(app: &TestApp, start: &str, end: &str) -> Value {
    json!({
        "room_id": app.room.room_id.value(),
        "requester_id": app.member.user_id.value(),
        "title": "Team sync",
        "start_datetime": format!("2024-01-15T{start}:00Z"),
        "end_datetime": format!("2024-01-15T{end}:00Z"),
    })
}

async fn send(router: &Router, request: Request<Body>) -> (HttpStatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body_bytes.to_vec())
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: &Value,
) -> (HttpStatusCode, Value) {
    let (status, bytes) = send(
        router,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await;
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get_json(router: &Router, uri: &str) -> (HttpStatusCode, Value) {
    let (status, bytes) = send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_csv(router: &Router, uri: &str, csv: &str) -> (HttpStatusCode, Value) {
    let (status, bytes) = send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/csv")
            .body(Body::from(csv.to_string()))
            .unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_create_booking_returns_pending_and_notifies_live_feed() {
    let app = create_test_app(ImportOptions::default()).await;
    let mut feed = app.state.live.subscribe();

    let body = create_test_booking_body(&app, "09:00", "10:00");
    let (status, booking) = send_json(&app.router, "POST", "/bookings", &body).await;

    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["start_datetime"], "2024-01-15T09:00:00Z");
    let booking_id = booking["booking_id"].as_i64().unwrap();

    let event = tokio::time::timeout(std::time::Duration::from_secs(2), feed.recv())
        .await
        .expect("live event")
        .unwrap();
    assert_eq!(event, LiveEvent::NewBooking { booking_id });
}

#[tokio::test]
async fn test_overlapping_booking_is_conflict() {
    let app = create_test_app(ImportOptions::default()).await;
    let first = create_test_booking_body(&app, "09:00", "10:00");
    send_json(&app.router, "POST", "/bookings", &first).await;

    let overlapping = create_test_booking_body(&app, "09:30", "10:30");
    let (status, error) = send_json(&app.router, "POST", "/bookings", &overlapping).await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(error["error"], true);
    assert_eq!(error["retryable"], false);

    let adjacent = create_test_booking_body(&app, "10:00", "11:00");
    let (status, _) = send_json(&app.router, "POST", "/bookings", &adjacent).await;
    assert_eq!(status, HttpStatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_booking_inputs_map_to_client_errors() {
    let app = create_test_app(ImportOptions::default()).await;

    let backwards = create_test_booking_body(&app, "10:00", "09:00");
    let (status, _) = send_json(&app.router, "POST", "/bookings", &backwards).await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);

    let mut missing_room = create_test_booking_body(&app, "09:00", "10:00");
    missing_room["room_id"] = json!(404);
    let (status, error) = send_json(&app.router, "POST", "/bookings", &missing_room).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    assert!(error["message"].as_str().unwrap().contains("Room"));
}

#[tokio::test]
async fn test_status_changes_are_gated_by_role_and_lifecycle() {
    let app = create_test_app(ImportOptions::default()).await;
    let body = create_test_booking_body(&app, "09:00", "10:00");
    let (_, booking) = send_json(&app.router, "POST", "/bookings", &body).await;
    let uri = format!("/bookings/{}/status", booking["booking_id"]);

    let by_member = json!({"actor_id": app.member.user_id.value(), "status": "APPROVED"});
    let (status, _) = send_json(&app.router, "POST", &uri, &by_member).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let by_approver = json!({"actor_id": app.approver.user_id.value(), "status": "approved"});
    let (status, approved) = send_json(&app.router, "POST", &uri, &by_approver).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");
    assert_eq!(approved["approver_id"], app.approver.user_id.value());

    let reject = json!({"actor_id": app.approver.user_id.value(), "status": "REJECTED"});
    let (status, _) = send_json(&app.router, "POST", &uri, &reject).await;
    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);

    let unknown = json!({"actor_id": app.approver.user_id.value(), "status": "ARCHIVED"});
    let (status, _) = send_json(&app.router, "POST", &uri, &unknown).await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_filters_and_approval_queue() {
    let app = create_test_app(ImportOptions::default()).await;
    for (start, end) in [("11:00", "12:00"), ("09:00", "10:00")] {
        let body = create_test_booking_body(&app, start, end);
        send_json(&app.router, "POST", "/bookings", &body).await;
    }

    let (status, listing) = get_json(
        &app.router,
        "/bookings?status=PENDING&sort=start_datetime&direction=asc",
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let starts: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["start_datetime"].as_str().unwrap())
        .collect();
    assert_eq!(starts, vec!["2024-01-15T09:00:00Z", "2024-01-15T11:00:00Z"]);
    assert_eq!(listing[0]["room_name"], "Orchid");
    assert_eq!(listing[0]["requester_name"], "alice tester");

    let (status, _) = get_json(&app.router, "/bookings?sort=colour").await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);

    let (status, queue) = get_json(
        &app.router,
        &format!("/approvals?actor_id={}", app.approver.user_id),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(queue.as_array().unwrap().len(), 2);

    let (status, _) = get_json(
        &app.router,
        &format!("/approvals?actor_id={}", app.member.user_id),
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (_, mine) = get_json(
        &app.router,
        &format!("/users/{}/bookings", app.member.user_id),
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let (_, dashboard) = get_json(&app.router, "/dashboard").await;
    assert_eq!(dashboard["total_bookings"], 2);
    assert_eq!(dashboard["pending_bookings"], 2);
    assert_eq!(dashboard["top_rooms"][0]["room_name"], "Orchid");
}

#[tokio::test]
async fn test_room_management_requires_admin() {
    let app = create_test_app(ImportOptions::default()).await;
    let room = |actor: &User| {
        json!({
            "actor_id": actor.user_id.value(),
            "name": "Lotus",
            "capacity": 12,
        })
    };

    let (status, _) = send_json(&app.router, "POST", "/rooms", &room(&app.member)).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (status, created) = send_json(&app.router, "POST", "/rooms", &room(&app.admin)).await;
    assert_eq!(status, HttpStatusCode::CREATED);
    assert_eq!(created["status"], "ACTIVE");

    let (_, rooms) = get_json(&app.router, "/rooms").await;
    assert_eq!(rooms.as_array().unwrap().len(), 2);

    let uri = format!("/rooms/{}?actor_id={}", created["room_id"], app.admin.user_id);
    let (status, _) = send_json(&app.router, "DELETE", &uri, &Value::Null).await;
    assert_eq!(status, HttpStatusCode::NO_CONTENT);
    let (status, _) = send_json(&app.router, "DELETE", &uri, &Value::Null).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_import_reports_row_failures_and_enforces_conflicts() {
    let app = create_test_app(ImportOptions::default()).await;
    let csv = format!(
        "room_id,user_id,title,start_datetime,end_datetime,status\n\
         {room},{user},Standup,2024-01-15T09:00:00,2024-01-15T09:30:00,APPROVED\n\
         {room},{user},Clash,2024-01-15T09:15:00,2024-01-15T09:45:00,PENDING\n\
         {room},{user},,2024-01-15T11:00:00,2024-01-15T12:00:00,PENDING\n",
        room = app.room.room_id,
        user = app.member.user_id,
    );

    let (status, result) = post_csv(
        &app.router,
        &format!("/import/bookings?actor_id={}", app.admin.user_id),
        &csv,
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(result["success_count"], 1);
    assert_eq!(result["failed_count"], 2);
    assert!(result["errors"][0].as_str().unwrap().starts_with("Clash: "));
}

#[tokio::test]
async fn test_bypass_policy_imports_overlapping_rows() {
    let app = create_test_app(ConflictPolicy::Bypass.import_options()).await;
    let csv = format!(
        "room_id,user_id,title,start_datetime,end_datetime,status\n\
         {room},{user},Standup,2024-01-15T09:00:00,2024-01-15T09:30:00,APPROVED\n\
         {room},{user},Clash,2024-01-15T09:15:00,2024-01-15T09:45:00,APPROVED\n",
        room = app.room.room_id,
        user = app.member.user_id,
    );

    let (_, result) = post_csv(
        &app.router,
        &format!("/import/bookings?actor_id={}", app.admin.user_id),
        &csv,
    )
    .await;

    assert_eq!(result["success_count"], 2);
}

#[tokio::test]
async fn test_import_requires_admin_and_known_kind() {
    let app = create_test_app(ImportOptions::default()).await;
    let template: &str = import_template(RecordKind::Users);

    let (status, _) = post_csv(
        &app.router,
        &format!("/import/users?actor_id={}", app.approver.user_id),
        template,
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (status, _) = post_csv(
        &app.router,
        &format!("/import/widgets?actor_id={}", app.admin.user_id),
        template,
    )
    .await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);

    let (status, _) = post_csv(
        &app.router,
        &format!("/import/users?actor_id={}", app.admin.user_id),
        "username,full_name\n\"broken,row\n",
    )
    .await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_never_writes() {
    let app = create_test_app(ImportOptions::default()).await;
    let csv = "username,password_hash,full_name\ncarol,secret,Carol C\ndave,,Dave D\n";

    let (status, preview) = post_csv(
        &app.router,
        &format!("/import/users/preview?actor_id={}", app.admin.user_id),
        csv,
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(preview["total_rows"], 2);
    assert_eq!(preview["valid_count"], 1);
    assert_eq!(preview["rows"][1]["status"], "INVALID");
    assert_eq!(app.state.repository.list_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_export_and_template_are_csv_downloads() {
    let app = create_test_app(ImportOptions::default()).await;

    let (status, bytes) = send(
        &app.router,
        Request::builder()
            .uri(format!("/export/users?actor_id={}", app.admin.user_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("\u{feff}id,username,"));
    assert!(csv.contains("alice tester"));

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/templates/bookings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), HttpStatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
}

#[test]
fn test_persistence_failure_is_retryable_service_unavailable() {
    let err: HttpError = HttpError::from(ApiError::PersistenceFailure {
        message: String::from("database is locked"),
    });

    assert_eq!(err.status, HttpStatusCode::SERVICE_UNAVAILABLE);
    assert!(err.retryable);
}
