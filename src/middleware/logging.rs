//! Logging middleware
//!
//! This module provides logging of inbound updates and handler timings.

use std::time::Instant;
use teloxide::types::{CallbackQuery, Message, Update, UpdateKind, User};
use tracing::{info, debug, warn, Span};
use serde_json::json;

/// Logging middleware for bot interactions
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    log_user_interactions: bool,
    log_performance: bool,
}

impl LoggingMiddleware {
    /// Create a new LoggingMiddleware instance
    pub fn new(log_user_interactions: bool, log_performance: bool) -> Self {
        Self {
            log_user_interactions,
            log_performance,
        }
    }

    /// Log incoming update
    pub fn log_update(&self, update: &Update) {
        if !self.log_user_interactions {
            return;
        }

        match update.kind {
            UpdateKind::Message(ref message) => self.log_message(message),
            UpdateKind::CallbackQuery(ref query) => self.log_callback(query),
            _ => {
                debug!(update_id = update.id.0, "Other update type received");
            }
        }
    }

    /// Log message details
    pub fn log_message(&self, message: &Message) {
        if !self.log_user_interactions {
            return;
        }

        let user_info = message.from.as_ref().map(|user| {
            json!({
                "id": user.id.0,
                "username": user.username,
                "first_name": user.first_name,
                "is_bot": user.is_bot
            })
        });

        let chat_type = if message.chat.is_private() {
            "private"
        } else if message.chat.is_supergroup() {
            "supergroup"
        } else if message.chat.is_group() {
            "group"
        } else {
            "channel"
        };

        if let Some(text) = message.text() {
            debug!(
                user = ?user_info,
                chat_id = message.chat.id.0,
                text = %text,
                "Text message received"
            );
        }

        info!(
            user = ?user_info,
            chat_id = message.chat.id.0,
            chat_type = chat_type,
            message_id = message.id.0,
            reply_to = message.reply_to_message().map(|m| m.id.0),
            "Message processed"
        );
    }

    /// Log a button press
    pub fn log_callback(&self, query: &CallbackQuery) {
        if !self.log_user_interactions {
            return;
        }

        info!(
            user_id = query.from.id.0,
            chat_id = query.message.as_ref().map(|m| m.chat().id.0),
            message_id = query.message.as_ref().map(|m| m.id().0),
            callback_data = query.data.as_deref().unwrap_or("none"),
            "Callback query received"
        );
    }

    /// Log command execution
    pub fn log_command(&self, user: Option<&User>, command: &str, args: &str) {
        if !self.log_user_interactions {
            return;
        }

        info!(
            user_id = user.map(|u| u.id.0),
            username = user.and_then(|u| u.username.as_deref()).unwrap_or("none"),
            command = command,
            args = args,
            "Command executed"
        );
    }

    /// Create a performance tracking span
    pub fn create_performance_span(&self, operation: &str) -> Option<PerformanceTracker> {
        if self.log_performance {
            Some(PerformanceTracker::new(operation.to_string()))
        } else {
            None
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Performance tracker for measuring operation duration
pub struct PerformanceTracker {
    operation: String,
    start_time: Instant,
    _span: Span,
}

impl PerformanceTracker {
    fn new(operation: String) -> Self {
        let span = tracing::info_span!("performance", operation = %operation);

        Self {
            operation,
            start_time: Instant::now(),
            _span: span,
        }
    }

    /// Complete the performance tracking and log the result
    pub fn complete(self, success: bool) {
        let duration_ms = self.start_time.elapsed().as_millis();

        if success {
            debug!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation completed successfully"
            );
        } else {
            warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation failed"
            );
        }

        // Log slow operations
        if duration_ms > 1000 {
            warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Slow operation detected"
            );
        }
    }
}
