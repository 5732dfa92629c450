// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_room_draft;
use crate::{BookingRepository, Persistence};
use roombook_domain::Room;

#[tokio::test]
async fn test_in_memory_databases_are_isolated() {
    let first: Persistence = Persistence::new_in_memory().unwrap();
    let second: Persistence = Persistence::new_in_memory().unwrap();

    first
        .create_room(&create_test_room_draft("Everest"))
        .await
        .unwrap();

    let rooms: Vec<Room> = second.list_rooms().await.unwrap();
    assert!(rooms.is_empty());
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "roombook_reopen_{}_{}.db",
        std::process::id(),
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    ));

    {
        let persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .create_room(&create_test_room_draft("Fuji"))
            .await
            .unwrap();
    }

    let reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let rooms: Vec<Room> = reopened.list_rooms().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "Fuji");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
