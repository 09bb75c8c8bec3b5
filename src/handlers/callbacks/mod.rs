//! Callback query handlers module
//!
//! This module handles the roster buttons attached to every game message

use teloxide::{Bot, types::{CallbackQuery, ChatId, MessageId, ParseMode, ReplyParameters}, prelude::*};
use tracing::{debug, warn};
use crate::utils::errors::{Result, RosterError};
use crate::services::ServiceFactory;
use crate::i18n::I18n;
use crate::handlers::keyboard::{roster_keyboard, ButtonAction};
use crate::models::AttendanceAction;
use crate::roster::UserProfile;

/// Popup shown in reply to a button press
struct Answer {
    text: String,
    show_alert: bool,
}

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let lang = i18n.detect_user_language(query.from.language_code.as_deref());

    let action = query.data.as_deref().and_then(ButtonAction::from_callback_data);
    let target = query.message.as_ref().map(|m| (m.chat().id, m.id()));

    let answer = match (action, target) {
        (Some(ButtonAction::Attendance(action)), Some((chat_id, message_id))) => {
            handle_attendance(&bot, &query, chat_id, message_id, action, &services, &i18n, &lang).await?
        }
        (Some(ButtonAction::BroadcastMaybe), Some((chat_id, message_id))) => {
            handle_broadcast_maybe(&bot, user_id, chat_id, message_id, &services, &i18n, &lang).await?
        }
        _ => {
            warn!(user_id = user_id, callback_data = ?query.data, "Unknown or detached callback query");
            None
        }
    };

    let mut request = bot.answer_callback_query(query.id.clone());
    if let Some(answer) = answer {
        request = request.text(answer.text).show_alert(answer.show_alert);
    }
    if let Err(e) = request.await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    Ok(())
}

/// Apply a Going/+1/-1/Maybe/Not going press and refresh the roster
#[allow(clippy::too_many_arguments)]
async fn handle_attendance(
    bot: &Bot,
    query: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    action: AttendanceAction,
    services: &ServiceFactory,
    i18n: &I18n,
    lang: &str,
) -> Result<Option<Answer>> {
    let profile = UserProfile::from(&query.from);

    match services
        .roster_service
        .apply_attendance(chat_id.0, message_id.0, &profile, action)
        .await
    {
        Ok(Some(text)) => {
            bot.edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Markdown)
                .reply_markup(roster_keyboard(i18n, i18n.default_language()))
                .await?;
            Ok(None)
        }
        Ok(None) => Ok(None),
        Err(e) => {
            debug!(chat_id = chat_id.0, event_id = message_id.0, error = %e, "Button press on unknown game");
            Ok(Some(Answer {
                text: i18n.t("errors.not_found", lang, None),
                show_alert: false,
            }))
        }
    }
}

/// Author-only: post everyone still marked as undecided
async fn handle_broadcast_maybe(
    bot: &Bot,
    user_id: i64,
    chat_id: ChatId,
    message_id: MessageId,
    services: &ServiceFactory,
    i18n: &I18n,
    lang: &str,
) -> Result<Option<Answer>> {
    match services
        .roster_service
        .maybe_list(chat_id.0, message_id.0, user_id)
        .await
    {
        Ok(names) => {
            let mut text = i18n.t("events.maybe_broadcast", i18n.default_language(), None);
            for name in names {
                text.push('\n');
                text.push_str(&name);
            }

            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Markdown)
                .reply_parameters(ReplyParameters::new(message_id))
                .await?;
            Ok(None)
        }
        Err(RosterError::NotAuthor { .. }) => Ok(Some(Answer {
            text: i18n.t("errors.action_author_only", lang, None),
            show_alert: true,
        })),
        Err(e) => {
            debug!(chat_id = chat_id.0, event_id = message_id.0, error = %e, "Maybe list unavailable");
            Ok(Some(Answer {
                text: i18n.t("errors.not_found", lang, None),
                show_alert: false,
            }))
        }
    }
}
