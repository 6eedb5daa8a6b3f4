//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use crate::messages::MENU_PROMPT;
use crate::router::{route, Action};

use super::ui_builder::create_district_keyboard;

pub async fn message_handler(bot: Bot, msg: Message) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    let action = route(text);
    debug!(chat_id = %msg.chat.id, message_length = text.len(), action = ?action, "Routed text message");

    match action {
        Action::ShowMenu => {
            bot.send_message(msg.chat.id, MENU_PROMPT)
                .reply_markup(create_district_keyboard())
                .await?;
        }
        Action::SendCanned(reply) => {
            bot.send_message(msg.chat.id, reply).await?;
        }
    }

    Ok(())
}
