//! Chat access middleware
//!
//! Commands are only served in chats listed in `bot.allowed_chat_ids`.

use std::collections::HashSet;
use teloxide::types::Message;
use tracing::debug;
use crate::config::BotConfig;
use crate::models::ChatKey;
use crate::utils::errors::{RosterBuddyError, Result};
use crate::utils::logging::log_access_denied;

/// Static allow-list of chats
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    allowed_chat_ids: HashSet<ChatKey>,
}

impl AccessGate {
    /// Create a new AccessGate from the bot configuration
    pub fn new(config: &BotConfig) -> Self {
        Self::from_ids(config.allowed_chat_ids.iter().copied())
    }

    pub fn from_ids(ids: impl IntoIterator<Item = ChatKey>) -> Self {
        Self {
            allowed_chat_ids: ids.into_iter().collect(),
        }
    }

    /// Check if a chat may use the bot
    pub fn is_allowed(&self, chat_id: ChatKey) -> bool {
        self.allowed_chat_ids.contains(&chat_id)
    }

    /// Gate a command message; logs and returns `AccessDenied` for unknown chats
    pub fn check_command(&self, message: &Message, command: &str) -> Result<()> {
        let chat_id = message.chat.id.0;

        if self.is_allowed(chat_id) {
            debug!(chat_id = chat_id, command = command, "Chat access granted");
            Ok(())
        } else {
            let user_id = message.from.as_ref().map(|u| u.id.0 as i64);
            log_access_denied(chat_id, user_id, command);
            Err(RosterBuddyError::AccessDenied { chat_id })
        }
    }

    pub fn allowed_chat_ids(&self) -> Vec<ChatKey> {
        self.allowed_chat_ids.iter().copied().collect()
    }
}
