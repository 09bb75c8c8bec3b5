//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for the roster buttons
//! - The roster inline keyboard shared by both

pub mod commands;
pub mod callbacks;
pub mod keyboard;

// Re-export commonly used handler functions
pub use commands::{handle_command, Command};
pub use callbacks::handle_callback_query;
pub use keyboard::{roster_keyboard, ButtonAction};
