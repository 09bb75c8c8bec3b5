//! RosterBuddy Telegram Bot
//!
//! A Telegram bot that runs sign-up rosters for paid group games: the organizer
//! posts a game, players mark themselves with inline buttons and the bot keeps
//! the roster, the waitlist and the per-player price up to date.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod roster;
pub mod state;
pub mod i18n;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{RosterBuddyError, Result};

// Re-export main components for easy access
pub use services::{RosterService, ServiceFactory};
pub use state::StateStorage;
pub use roster::EventStore;
pub use i18n::I18n;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
