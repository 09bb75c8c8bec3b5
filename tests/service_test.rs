//! RosterService tests: the handler-facing API with a fixed clock and a
//! snapshot file in a temp dir.

use std::sync::Arc;
use chrono::NaiveDate;
use assert_matches::assert_matches;
use tempfile::TempDir;

use RosterBuddy::config::RosterConfig;
use RosterBuddy::models::{AttendanceAction, EventField};
use RosterBuddy::roster::{FixedClock, RosterLabels, UserProfile};
use RosterBuddy::services::RosterService;
use RosterBuddy::state::StateStorage;
use RosterBuddy::utils::errors::{RosterBuddyError, RosterError, ValidationError};

const CHAT: i64 = -1001234567890;
const AUTHOR: i64 = 1;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("Failed to create temp dir") }
    }

    fn service_on(&self, today: NaiveDate) -> RosterService {
        RosterService::new(
            StateStorage::file(self.dir.path().join("chats_data.json")),
            Arc::new(FixedClock(today)),
            &RosterConfig::default(),
            RosterLabels::default(),
        )
    }

    fn service(&self) -> RosterService {
        self.service_on(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap())
    }
}

fn user(id: i64, first_name: &str) -> UserProfile {
    UserProfile {
        id,
        first_name: first_name.to_string(),
        last_name: None,
        username: None,
    }
}

async fn post_game(service: &RosterService, event_id: i32, args: &str) {
    let today = service.today();
    let parsed = service.parse_new_event(args, today).unwrap();
    service.create_event(CHAT, event_id, &parsed, AUTHOR, today).await;
}

#[tokio::test]
async fn test_new_event_uses_overrides_and_clean_title() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "20.05 #game ₽1000 ч.2 max.4 court 3").await;

    let text = service.render(CHAT, 10).await.unwrap();
    assert!(text.starts_with("20.05.2024 #game court 3\n"));
    assert!(text.contains("Price per hour: `1000₽`"));
    assert!(text.contains("Duration: `2h`"));
    assert!(text.contains("Total: `2000₽`"));
    assert!(text.ends_with("Per person: `0₽`"));
}

#[tokio::test]
async fn test_bad_date_is_rejected() {
    let ctx = TestContext::new();
    let service = ctx.service();

    let today = service.today();
    assert_matches!(service.parse_new_event("#game", today), Err(RosterBuddyError::InvalidInput(_)));
    assert_matches!(service.parse_new_event("", today), Err(RosterBuddyError::InvalidInput(_)));
}

#[tokio::test]
async fn test_button_presses_render_mentions_with_alias() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "20 #game").await;
    service.set_alias(CHAT, 7, Some("Goalie")).await;

    let text = service
        .apply_attendance(CHAT, 10, &user(7, "Gregory"), AttendanceAction::JoinGoing)
        .await
        .unwrap()
        .expect("roster changed");
    assert!(text.contains("1. [Goalie](tg://user?id=7)"));

    let text = service
        .apply_attendance(CHAT, 10, &user(8, "Hana"), AttendanceAction::JoinMaybe)
        .await
        .unwrap()
        .unwrap();
    assert!(text.contains("2. [Hana](tg://user?id=8) (pending)"));
}

#[tokio::test]
async fn test_maybe_broadcast_is_author_only() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "20 #game").await;
    service
        .apply_attendance(CHAT, 10, &user(8, "Hana"), AttendanceAction::JoinMaybe)
        .await
        .unwrap();

    assert_matches!(
        service.maybe_list(CHAT, 10, 8).await,
        Err(RosterError::NotAuthor { event_id: 10, user_id: 8 })
    );
    assert_eq!(
        service.maybe_list(CHAT, 10, AUTHOR).await.unwrap(),
        vec!["[Hana](tg://user?id=8)".to_string()]
    );
}

#[tokio::test]
async fn test_field_edits_check_existence_then_author_then_value() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "20 #game").await;

    assert_matches!(
        service.set_field(CHAT, 99, 2, EventField::HourlyRate, "abc").await,
        Err(RosterError::NotFound { event_id: 99 })
    );
    assert_matches!(
        service.set_field(CHAT, 10, 2, EventField::HourlyRate, "abc").await,
        Err(RosterError::NotAuthor { .. })
    );
    assert_matches!(
        service.set_field(CHAT, 10, AUTHOR, EventField::HourlyRate, "abc").await,
        Err(RosterError::Validation(ValidationError::NotANumber(_)))
    );

    let text = service.set_field(CHAT, 10, AUTHOR, EventField::HourlyRate, "3000").await.unwrap();
    assert!(text.contains("Total: `9000₽`"));
}

#[tokio::test]
async fn test_list_sweeps_expired_games() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "16.05 #tomorrow").await;
    post_game(&service, 11, "25.05 #later").await;
    service.flush().await.unwrap();

    // two days on, the first game is over
    let later = ctx.service_on(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
    later.load().await.unwrap();

    let active = later.list_active(CHAT).await;
    assert_eq!(active, vec![(11, "25.05.2024 #later".to_string())]);
    assert!(later.is_dirty());
    assert!(later.render(CHAT, 10).await.is_none());
}

#[tokio::test]
async fn test_empty_chat_lists_nothing() {
    let ctx = TestContext::new();
    let service = ctx.service();

    assert!(service.list_active(CHAT).await.is_empty());
    assert!(!service.is_dirty());
}

#[tokio::test]
async fn test_flush_and_reload() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "20 #game").await;
    service
        .apply_attendance(CHAT, 10, &user(7, "Gregory"), AttendanceAction::JoinPlusOne)
        .await
        .unwrap();
    assert!(service.flush_if_dirty().await.unwrap());

    let restarted = ctx.service();
    restarted.load().await.unwrap();

    assert_eq!(restarted.snapshot().await, service.snapshot().await);
    assert_eq!(restarted.render(CHAT, 10).await, service.render(CHAT, 10).await);
}

#[tokio::test]
async fn test_deleted_game_stays_deleted_after_reload() {
    let ctx = TestContext::new();
    let service = ctx.service();
    post_game(&service, 10, "20 #game").await;

    assert_matches!(service.delete_event(CHAT, 10, 2).await, Err(RosterError::NotAuthor { .. }));
    let removed = service.delete_event(CHAT, 10, AUTHOR).await.unwrap();
    assert_eq!(removed.id, 10);
    service.flush().await.unwrap();

    let restarted = ctx.service();
    restarted.load().await.unwrap();
    assert!(restarted.render(CHAT, 10).await.is_none());
}
