//! Error handling for RosterBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use crate::models::{EventId, UserKey};

/// Main error type for RosterBuddy application
#[derive(Error, Debug)]
pub enum RosterBuddyError {
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Access denied for chat {chat_id}")]
    AccessDenied { chat_id: i64 },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors returned by event store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Event not found: {event_id}")]
    NotFound { event_id: EventId },

    #[error("User {user_id} is not the author of event {event_id}")]
    NotAuthor { event_id: EventId, user_id: UserKey },

    #[error("Invalid value: {0}")]
    Validation(#[from] ValidationError),
}

/// Why a numeric field value was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no value given")]
    Missing,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{0} is not greater than 0")]
    NotPositive(i64),
}

/// Result type alias for RosterBuddy operations
pub type Result<T> = std::result::Result<T, RosterBuddyError>;

/// Result type alias for event store operations
pub type RosterResult<T> = std::result::Result<T, RosterError>;

impl RosterBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            RosterBuddyError::Roster(_) => true,
            RosterBuddyError::Telegram(_) => true,
            RosterBuddyError::Config(_) => false,
            RosterBuddyError::ConfigSource(_) => false,
            RosterBuddyError::AccessDenied { .. } => true,
            RosterBuddyError::Redis(_) => true,
            RosterBuddyError::Serialization(_) => false,
            RosterBuddyError::Io(_) => true,
            RosterBuddyError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RosterBuddyError::Config(_) | RosterBuddyError::ConfigSource(_) => ErrorSeverity::Critical,
            RosterBuddyError::AccessDenied { .. } => ErrorSeverity::Warning,
            RosterBuddyError::Roster(RosterError::NotAuthor { .. }) => ErrorSeverity::Warning,
            RosterBuddyError::Roster(_) => ErrorSeverity::Info,
            RosterBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_errors_are_recoverable() {
        let err: RosterBuddyError = RosterError::NotFound { event_id: 5 }.into();
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Info);

        let err: RosterBuddyError = RosterError::NotAuthor { event_id: 5, user_id: 9 }.into();
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.to_string(), "Roster error: User 9 is not the author of event 5");
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = RosterBuddyError::Config("Bot token is required".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.severity().to_string(), "CRITICAL");
    }
}
