// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use roombook_domain::RoomDraft;

/// Writes `contents` to a file unique to the calling test.
fn create_test_file(name: &str, contents: &str) -> PathBuf {
    let path: PathBuf =
        std::env::temp_dir().join(format!("roombook-cli-{}-{name}.csv", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

async fn run(command: Command, repository: &dyn BookingRepository) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    command.execute(repository, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_args_parse_import_with_bypass() {
    let args = Args::try_parse_from([
        "roombook-cli",
        "--database",
        "rooms.db",
        "import",
        "bookings",
        "history.csv",
        "--bypass-conflicts",
    ])
    .unwrap();

    assert_eq!(args.database, Some(PathBuf::from("rooms.db")));
    assert!(matches!(
        args.command,
        Command::Import {
            kind: Kind::Bookings,
            bypass_conflicts: true,
            ..
        }
    ));
}

#[test]
fn test_unknown_kind_is_rejected_by_parser() {
    let parsed = Args::try_parse_from(["roombook-cli", "template", "widgets"]);
    assert!(parsed.is_err());
}

#[tokio::test]
async fn test_template_runs_without_database() {
    let args = Args::try_parse_from(["roombook-cli", "template", "users"]).unwrap();
    assert!(args.run().await.is_ok());

    let missing = Args::try_parse_from(["roombook-cli", "export", "users"]).unwrap();
    let err = missing.run().await.unwrap_err();
    assert!(err.to_string().contains("--database"));
}

#[tokio::test]
async fn test_import_prints_totals_and_row_errors() {
    let repo = Persistence::new_in_memory().unwrap();
    let file = create_test_file(
        "users",
        "username,password_hash,full_name,role\n\
         carol,secret,Carol C,APPROVER\n\
         dave,secret,,MEMBER\n",
    );

    let output = run(
        Command::Import {
            kind: Kind::Users,
            file: file.clone(),
            bypass_conflicts: false,
        },
        &repo,
    )
    .await
    .unwrap();
    std::fs::remove_file(&file).unwrap();

    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Imported 1 row(s), 1 failed"));
    assert!(lines.next().unwrap().starts_with("  dave: "));
    assert_eq!(repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_enforces_conflicts_unless_bypassed() {
    let repo = Persistence::new_in_memory().unwrap();
    let users = create_test_file(
        "conflict-users",
        "username,password_hash,full_name\nerin,pw,Erin E\n",
    );
    run(
        Command::Import {
            kind: Kind::Users,
            file: users.clone(),
            bypass_conflicts: false,
        },
        &repo,
    )
    .await
    .unwrap();
    std::fs::remove_file(&users).unwrap();
    let room = repo
        .create_room(&RoomDraft {
            name: String::from("Orchid"),
            location: String::new(),
            capacity: 6,
            equipment: String::new(),
            image_url: None,
            status: roombook_domain::RoomStatus::Active,
        })
        .await
        .unwrap();
    let user_id = repo.list_users().await.unwrap()[0].user_id;
    let bookings = create_test_file(
        "conflict-bookings",
        &format!(
            "room_id,user_id,title,start_datetime,end_datetime,status\n\
             {room},{user_id},One,2024-01-15 09:00:00,2024-01-15 10:00:00,APPROVED\n\
             {room},{user_id},Two,2024-01-15 09:30:00,2024-01-15 10:30:00,APPROVED\n",
            room = room.room_id,
        ),
    );

    let enforced = run(
        Command::Import {
            kind: Kind::Bookings,
            file: bookings.clone(),
            bypass_conflicts: false,
        },
        &repo,
    )
    .await
    .unwrap();
    assert!(enforced.starts_with("Imported 1 row(s), 1 failed"));

    let bypassed = run(
        Command::Import {
            kind: Kind::Bookings,
            file: bookings.clone(),
            bypass_conflicts: true,
        },
        &repo,
    )
    .await
    .unwrap();
    std::fs::remove_file(&bookings).unwrap();
    assert!(bypassed.starts_with("Imported 2 row(s), 0 failed"));
}

#[tokio::test]
async fn test_unreadable_batch_fails_the_command() {
    let repo = Persistence::new_in_memory().unwrap();
    let file = create_test_file("broken", "username,full_name\n\"carol,Carol\n");

    let result = run(
        Command::Import {
            kind: Kind::Users,
            file: file.clone(),
            bypass_conflicts: false,
        },
        &repo,
    )
    .await;
    std::fs::remove_file(&file).unwrap();

    assert!(result.is_err());
}

#[tokio::test]
async fn test_preview_lists_each_row() {
    let repo = Persistence::new_in_memory().unwrap();
    let file = create_test_file(
        "preview",
        "room_id,user_id,title,start_datetime,end_datetime\n\
         1,1,Standup,2024-01-15T09:00:00Z,2024-01-15T09:15:00Z\n\
         1,1,Backwards,2024-01-15T10:00:00Z,2024-01-15T09:00:00Z\n",
    );

    let output = run(
        Command::Preview {
            kind: Kind::Bookings,
            file: file.clone(),
        },
        &repo,
    )
    .await
    .unwrap();
    std::fs::remove_file(&file).unwrap();

    assert!(output.starts_with("2 row(s): 1 valid, 1 invalid\n"));
    assert!(output.contains("  row 1 Standup [ok]\n"));
    assert!(output.contains("  row 2 Backwards [INVALID]\n"));
    assert!(repo.list_bookings(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_writes_to_output_file() {
    let repo = Persistence::new_in_memory().unwrap();
    let path: PathBuf =
        std::env::temp_dir().join(format!("roombook-cli-{}-export.csv", std::process::id()));

    let printed = run(
        Command::Export {
            kind: Kind::Bookings,
            output: Some(path.clone()),
        },
        &repo,
    )
    .await
    .unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(printed.is_empty());
    assert!(written.starts_with("\u{feff}id,room_id,room_name,"));
}
