// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roombook_domain::{AccountStatus, RoomId, RoomStatus, UserRole};
use roombook_persistence::BookingRepository;

use super::helpers::{
    create_test_persistence, create_test_room_draft, create_test_user,
    create_test_user_with_status,
};
use crate::{ApiError, RoomRequest, create_room, delete_room, list_rooms, update_room};

#[tokio::test]
async fn test_admin_creates_rooms_listed_by_name() {
    let repo = create_test_persistence();
    let admin = create_test_user(&repo, "root", UserRole::Admin).await;

    create_room(&repo, &admin, &create_test_room_draft("Orchid"))
        .await
        .unwrap();
    create_room(&repo, &admin, &create_test_room_draft("Lotus"))
        .await
        .unwrap();

    let names: Vec<String> = list_rooms(&repo)
        .await
        .unwrap()
        .into_iter()
        .map(|room| room.name)
        .collect();
    assert_eq!(names, vec!["Lotus", "Orchid"]);
}

#[tokio::test]
async fn test_non_admins_cannot_manage_rooms() {
    let repo = create_test_persistence();
    let approver = create_test_user(&repo, "bob", UserRole::Approver).await;
    let retired =
        create_test_user_with_status(&repo, "old", UserRole::Admin, AccountStatus::Inactive).await;

    for actor in [&approver, &retired] {
        let result = create_room(&repo, actor, &create_test_room_draft("Orchid")).await;
        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    }
    assert!(repo.list_rooms().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_room_capacity_must_be_positive() {
    let repo = create_test_persistence();
    let admin = create_test_user(&repo, "root", UserRole::Admin).await;
    let mut draft = create_test_room_draft("Orchid");
    draft.capacity = 0;

    let result = create_room(&repo, &admin, &draft).await;

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "capacity"
    ));
}

#[tokio::test]
async fn test_update_replaces_details_and_missing_room_is_not_found() {
    let repo = create_test_persistence();
    let admin = create_test_user(&repo, "root", UserRole::Admin).await;
    let room = create_room(&repo, &admin, &create_test_room_draft("Orchid"))
        .await
        .unwrap();

    let request = RoomRequest {
        actor_id: admin.user_id.value(),
        name: String::from(" Orchid Suite "),
        location: String::from("Floor 9"),
        capacity: 20,
        equipment: String::new(),
        image_url: Some(String::from("  ")),
        status: Some(String::from("maintenance")),
    };
    let updated = update_room(&repo, &admin, room.room_id, &request.to_draft().unwrap())
        .await
        .unwrap();

    assert_eq!(updated.name, "Orchid Suite");
    assert_eq!(updated.capacity, 20);
    assert_eq!(updated.image_url, None);
    assert_eq!(updated.status, RoomStatus::Maintenance);

    let missing = update_room(
        &repo,
        &admin,
        RoomId::new(404),
        &create_test_room_draft("Nowhere"),
    )
    .await;
    assert!(matches!(
        missing,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Room"
    ));
}

#[tokio::test]
async fn test_delete_room() {
    let repo = create_test_persistence();
    let admin = create_test_user(&repo, "root", UserRole::Admin).await;
    let room = create_room(&repo, &admin, &create_test_room_draft("Orchid"))
        .await
        .unwrap();

    delete_room(&repo, &admin, room.room_id).await.unwrap();

    assert!(repo.get_room(room.room_id).await.unwrap().is_none());
    assert!(matches!(
        delete_room(&repo, &admin, room.room_id).await,
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_unknown_room_status_is_invalid_input() {
    let request = RoomRequest {
        actor_id: 1,
        name: String::from("Orchid"),
        location: String::new(),
        capacity: 4,
        equipment: String::new(),
        image_url: None,
        status: Some(String::from("closed")),
    };

    assert!(matches!(
        request.to_draft(),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}
