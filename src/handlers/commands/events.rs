//! Event lifecycle command handlers

use teloxide::{Bot, prelude::*, types::{Message, MessageId, ParseMode, ReplyParameters}, utils::command::BotCommands};
use tracing::{debug, info, warn};
use crate::utils::errors::{Result, RosterError};
use crate::services::ServiceFactory;
use crate::i18n::I18n;
use crate::handlers::keyboard::roster_keyboard;
use super::{reply, reply_target, sender_id, user_language, Command};

/// Handle /new: post the roster message and store the event under its id
pub async fn handle_new(
    bot: Bot,
    msg: Message,
    args: String,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let author_id = sender_id(&msg)?;
    let lang = user_language(&msg, &i18n);
    let roster = &services.roster_service;
    let today = roster.today();

    let parsed = match roster.parse_new_event(&args, today) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(chat_id = chat_id.0, user_id = author_id, args = %args, error = %e, "Error while parsing /new arguments");
            bot.send_message(chat_id, i18n.t("events.usage", &lang, None))
                .parse_mode(ParseMode::Markdown)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
            return Ok(());
        }
    };

    info!(chat_id = chat_id.0, user_id = author_id, date = %parsed.date, title = %parsed.title, "New game");

    let posted = bot
        .send_message(chat_id, roster.preview(&parsed, author_id, today))
        .parse_mode(ParseMode::Markdown)
        .reply_markup(roster_keyboard(&i18n, i18n.default_language()))
        .await?;

    roster.create_event(chat_id.0, posted.id.0, &parsed, author_id, today).await;
    Ok(())
}

/// Handle /delete sent as a reply to a roster message
pub async fn handle_delete(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let user_id = sender_id(&msg)?;
    let lang = user_language(&msg, &i18n);

    let Some(event_id) = reply_target(&msg) else {
        reply(&bot, &msg, i18n.t("errors.reply_required", &lang, None)).await?;
        return Ok(());
    };

    match services.roster_service.delete_event(chat_id.0, event_id, user_id).await {
        Ok(_) => {
            if let Err(e) = bot.delete_message(chat_id, MessageId(event_id)).await {
                warn!(chat_id = chat_id.0, event_id = event_id, error = %e, "Failed to delete roster message");
            }
            reply(&bot, &msg, i18n.t("events.deleted", &lang, None)).await?;
        }
        Err(RosterError::NotAuthor { .. }) => {
            reply(&bot, &msg, i18n.t("errors.delete_author_only", &lang, None)).await?;
        }
        Err(e) => {
            debug!(chat_id = chat_id.0, event_id = event_id, error = %e, "Delete rejected");
            reply(&bot, &msg, i18n.t("errors.not_found", &lang, None)).await?;
        }
    }

    Ok(())
}

/// Handle /list: drop expired games, then point at every remaining roster
pub async fn handle_list(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let lang = user_language(&msg, &i18n);

    let active = services.roster_service.list_active(chat_id.0).await;
    if active.is_empty() {
        reply(&bot, &msg, i18n.t("events.list_empty", &lang, None)).await?;
        return Ok(());
    }

    for (event_id, header) in active {
        let sent = bot
            .send_message(chat_id, header)
            .reply_parameters(ReplyParameters::new(MessageId(event_id)))
            .await;

        // the roster message may have been removed by hand
        if let Err(e) = sent {
            warn!(chat_id = chat_id.0, event_id = event_id, error = %e, "Failed to reply to roster message");
        }
    }

    Ok(())
}

/// Handle /help
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    reply(&bot, &msg, Command::descriptions().to_string()).await?;
    Ok(())
}
