//! /price, /hour and /max_players_count handlers

use teloxide::{Bot, prelude::*, types::{Message, MessageId, ParseMode}};
use tracing::warn;
use crate::utils::errors::{Result, RosterError, ValidationError};
use crate::services::ServiceFactory;
use crate::i18n::I18n;
use crate::handlers::keyboard::roster_keyboard;
use crate::models::EventField;
use super::{reply, reply_target, sender_id, user_language};

/// Translation key for a field-specific message, e.g. `fields.capacity.updated`
pub fn field_key(field: EventField, message: &str) -> String {
    format!("fields.{}.{}", field, message)
}

/// Translation key explaining why a field edit was rejected
pub fn rejection_key(field: EventField, error: &RosterError) -> String {
    match error {
        RosterError::NotFound { .. } => "errors.not_found".to_string(),
        RosterError::NotAuthor { .. } => "errors.edit_author_only".to_string(),
        RosterError::Validation(ValidationError::Missing) => field_key(field, "missing"),
        RosterError::Validation(ValidationError::NotANumber(_)) => field_key(field, "not_a_number"),
        RosterError::Validation(ValidationError::NotPositive(_)) => field_key(field, "not_positive"),
    }
}

/// Handle an author-only numeric edit sent as a reply to a roster message
pub async fn handle_set_field(
    bot: Bot,
    msg: Message,
    field: EventField,
    value: String,
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

    let text = match services
        .roster_service
        .set_field(chat_id.0, event_id, user_id, field, &value)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            reply(&bot, &msg, i18n.t(&rejection_key(field, &e), &lang, None)).await?;
            return Ok(());
        }
    };

    reply(&bot, &msg, i18n.t(&field_key(field, "updated"), &lang, None)).await?;

    let edited = bot
        .edit_message_text(chat_id, MessageId(event_id), text)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(roster_keyboard(&i18n, i18n.default_language()))
        .await;
    if let Err(e) = edited {
        warn!(chat_id = chat_id.0, event_id = event_id, error = %e, "Failed to edit roster message");
    }

    Ok(())
}
