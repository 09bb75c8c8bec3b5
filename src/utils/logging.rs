//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the RosterBuddy application.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::models::{AttendanceAction, AttendanceStatus, ChatKey, EventId, UserKey};
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held by `main`.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = if config.directory.is_empty() {
        (None, None)
    } else {
        let file_appender = tracing_appender::rolling::daily(&config.directory, "rosterbuddy.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .boxed();
        (Some(layer), Some(guard))
    };

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log event lifecycle actions (create, delete, field edits)
pub fn log_event_action(chat_id: ChatKey, event_id: EventId, action: &str, user_id: UserKey, details: Option<&str>) {
    info!(
        chat_id = chat_id,
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log a button press, the presser's resulting status and the waitlist size
pub fn log_attendance_change(
    chat_id: ChatKey,
    event_id: EventId,
    user_id: UserKey,
    action: AttendanceAction,
    status: Option<AttendanceStatus>,
    waitlisted: usize,
    changed: bool,
) {
    if changed {
        info!(
            chat_id = chat_id,
            event_id = event_id,
            user_id = user_id,
            action = %action,
            status = ?status,
            waitlisted = waitlisted,
            "Roster changed"
        );
    } else {
        debug!(
            chat_id = chat_id,
            event_id = event_id,
            user_id = user_id,
            action = %action,
            status = ?status,
            "Roster unchanged"
        );
    }
}

/// Log a command rejected by the chat allow-list
pub fn log_access_denied(chat_id: ChatKey, user_id: Option<UserKey>, command: &str) {
    warn!(
        chat_id = chat_id,
        user_id = user_id,
        command = command,
        "Command not allowed in this chat"
    );
}

/// Log snapshot persistence
pub fn log_snapshot(backend: &str, chats: usize, events: usize, duration_ms: u64) {
    debug!(
        backend = backend,
        chats = chats,
        events = events,
        duration_ms = duration_ms,
        "Snapshot saved"
    );
}
