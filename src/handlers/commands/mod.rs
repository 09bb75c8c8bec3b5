//! Command handlers module
//!
//! This module contains handlers for all bot commands like /new, /list, etc.

pub mod alias;
pub mod events;
pub mod fields;

use teloxide::{Bot, prelude::*, types::{Message, ReplyParameters}, utils::command::BotCommands};
use tracing::debug;
use crate::utils::errors::{RosterBuddyError, Result};
use crate::services::ServiceFactory;
use crate::i18n::I18n;
use crate::middleware::LoggingMiddleware;
use crate::models::{EventField, EventId};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "RosterBuddy commands:")]
pub enum Command {
    #[command(description = "Post a game: /new DATE TEXT [₽PRICE] [ч.HOURS] [max.PLAYERS]")]
    New(String),
    #[command(description = "Delete the game you reply to (author only)")]
    Delete,
    #[command(description = "List upcoming games")]
    List,
    #[command(description = "Set your name on rosters; empty to reset")]
    Mynameis(String),
    #[command(description = "Set the hourly price of the game you reply to")]
    Price(String),
    #[command(description = "Set the duration of the game you reply to")]
    Hour(String),
    #[command(description = "Set the player limit of the game you reply to")]
    MaxPlayersCount(String),
    #[command(description = "Show help information")]
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::New(_) => "new",
            Command::Delete => "delete",
            Command::List => "list",
            Command::Mynameis(_) => "mynameis",
            Command::Price(_) => "price",
            Command::Hour(_) => "hour",
            Command::MaxPlayersCount(_) => "max_players_count",
            Command::Help => "help",
        }
    }

    pub fn args(&self) -> &str {
        match self {
            Command::New(args)
            | Command::Mynameis(args)
            | Command::Price(args)
            | Command::Hour(args)
            | Command::MaxPlayersCount(args) => args,
            Command::Delete | Command::List | Command::Help => "",
        }
    }
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    logging: LoggingMiddleware,
    i18n: I18n,
) -> Result<()> {
    logging.log_command(msg.from.as_ref(), cmd.name(), cmd.args());
    let tracker = logging.create_performance_span(cmd.name());

    if let Err(e) = services.access_gate.check_command(&msg, cmd.name()) {
        let lang = user_language(&msg, &i18n);
        reply(&bot, &msg, i18n.t("errors.access_denied", &lang, None)).await?;
        if let Some(tracker) = tracker {
            tracker.complete(false);
        }
        debug!(error = %e, "Command rejected");
        return Ok(());
    }

    let result = match cmd {
        Command::New(args) => events::handle_new(bot, msg, args, services, i18n).await,
        Command::Delete => events::handle_delete(bot, msg, services, i18n).await,
        Command::List => events::handle_list(bot, msg, services, i18n).await,
        Command::Help => events::handle_help(bot, msg).await,
        Command::Mynameis(name) => alias::handle_mynameis(bot, msg, name, services, i18n).await,
        Command::Price(value) => fields::handle_set_field(bot, msg, EventField::HourlyRate, value, services, i18n).await,
        Command::Hour(value) => fields::handle_set_field(bot, msg, EventField::DurationHours, value, services, i18n).await,
        Command::MaxPlayersCount(value) => {
            fields::handle_set_field(bot, msg, EventField::Capacity, value, services, i18n).await
        }
    };

    if let Some(tracker) = tracker {
        tracker.complete(result.is_ok());
    }
    result
}

/// Language for replies to the sender of `msg`
pub fn user_language(msg: &Message, i18n: &I18n) -> String {
    i18n.detect_user_language(msg.from.as_ref().and_then(|u| u.language_code.as_deref()))
}

/// Numeric id of the sender of `msg`
pub fn sender_id(msg: &Message) -> Result<i64> {
    msg.from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .ok_or_else(|| RosterBuddyError::InvalidInput("No user in message".to_string()))
}

/// Event id targeted by a reply-style command
pub fn reply_target(msg: &Message) -> Option<EventId> {
    msg.reply_to_message().map(|target| target.id.0)
}

/// Send `text` as a reply to `msg`
pub async fn reply(bot: &Bot, msg: &Message, text: String) -> Result<Message> {
    let sent = bot
        .send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(sent)
}
