//! /mynameis handler

use std::collections::HashMap;
use teloxide::{Bot, types::Message};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::i18n::I18n;
use crate::roster::AliasChange;
use super::{reply, sender_id, user_language};

/// Handle /mynameis NAME (set) and bare /mynameis (reset).
///
/// Existing roster entries keep the name they were signed up with.
pub async fn handle_mynameis(
    bot: Bot,
    msg: Message,
    name: String,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let user_id = sender_id(&msg)?;
    let lang = user_language(&msg, &i18n);

    let change = services
        .roster_service
        .set_alias(msg.chat.id.0, user_id, Some(name.as_str()))
        .await;

    match change {
        AliasChange::Set(name) => {
            let mut params = HashMap::new();
            params.insert("name".to_string(), name);
            reply(&bot, &msg, i18n.t("alias.set", &lang, Some(&params))).await?;
        }
        AliasChange::Cleared => {
            reply(&bot, &msg, i18n.t("alias.cleared", &lang, None)).await?;
        }
        AliasChange::Unchanged => {}
    }

    Ok(())
}
