//! Snapshot storage tests
//!
//! File backend only; the Redis backend shares the same JSON encoding.

use chrono::NaiveDate;
use RosterBuddy::models::{AttendanceAction, AttendanceStatus, CreateEventRequest, EventDefaults};
use RosterBuddy::roster::EventStore;
use RosterBuddy::state::StateStorage;

fn populated_store() -> EventStore {
    let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    let mut store = EventStore::new();

    for (chat_id, event_id) in [(-100_i64, 11_i32), (-100, 12), (-200, 11)] {
        let chat = store.chat_mut(chat_id);
        chat.create(
            CreateEventRequest {
                id: event_id,
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                title: format!("#game {}", event_id),
                author_id: 1,
                hourly_rate: Some(1000),
                duration_hours: Some(2),
                capacity: Some(12),
            },
            &EventDefaults::default(),
            today,
        );
        chat.apply_attendance(event_id, 2, "[Bob](tg://user?id=2)", AttendanceAction::JoinGoing).unwrap();
        chat.apply_attendance(event_id, 3, "Carol", AttendanceAction::JoinMaybe).unwrap();
        chat.apply_attendance(event_id, 2, "[Bob](tg://user?id=2)", AttendanceAction::JoinPlusOne).unwrap();
    }
    store.set_alias(-100, 3, Some("Caz"));
    store
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("chats_data.json");
    let store = populated_store();

    StateStorage::file(&path).save(&store).await.unwrap();

    // a fresh storage handle, as after a process restart
    let loaded = StateStorage::file(&path).load().await.unwrap();
    assert_eq!(loaded, store);

    let event = loaded.chat(-100).unwrap().get(12).unwrap();
    let statuses: Vec<AttendanceStatus> = event.attendees.iter().map(|a| a.status).collect();
    assert_eq!(
        statuses,
        vec![AttendanceStatus::Going, AttendanceStatus::Maybe, AttendanceStatus::GoingPlusOne]
    );
    assert_eq!(loaded.chat(-100).unwrap().alias(3), Some("Caz"));
}

#[tokio::test]
async fn test_snapshot_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chats_data.json");
    StateStorage::file(&path).save(&populated_store()).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let event = &value["chats"]["-100"]["events"]["11"];
    assert_eq!(event["date"], "2024-06-01");
    assert_eq!(event["capacity"], 12);
    assert_eq!(event["attendees"][1]["status"], "maybe");
    assert_eq!(value["chats"]["-100"]["aliases"]["3"], "Caz");
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StateStorage::file(dir.path().join("chats_data.json"));

    storage.save(&populated_store()).await.unwrap();
    storage.save(&EventStore::new()).await.unwrap();

    assert_eq!(storage.load().await.unwrap().event_count(), 0);
}

#[tokio::test]
async fn test_event_without_attendees_field_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chats_data.json");
    std::fs::write(
        &path,
        r#"{"chats":{"-5":{"events":{"7":{"id":7,"date":"2024-06-01","title":"t","author_id":1,
            "hourly_rate":2500,"duration_hours":3,"capacity":14}}}}}"#,
    )
    .unwrap();

    let loaded = StateStorage::file(&path).load().await.unwrap();
    let event = loaded.chat(-5).unwrap().get(7).unwrap();
    assert!(event.attendees.is_empty());
    assert!(loaded.chat(-5).unwrap().alias(1).is_none());
}
