//! Callback Handler module for processing district selections

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error, warn};

use crate::config::CallbackMatch;
use crate::district::District;
use crate::favorites::FavoritesService;
use crate::messages::{DATA_SOURCE_UNAVAILABLE, UNRECOGNIZED_CALLBACK};

use super::ui_builder::create_district_keyboard;

/// Outcome of a district selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackReply {
    /// Formatted ranking (possibly the "no favorites" text)
    Ranking(String),
    /// The lookup failed; the user may pick again
    Unavailable,
    /// The payload named no known district
    Unrecognized,
}

impl CallbackReply {
    pub fn text(&self) -> &str {
        match self {
            CallbackReply::Ranking(text) => text,
            CallbackReply::Unavailable => DATA_SOURCE_UNAVAILABLE,
            CallbackReply::Unrecognized => UNRECOGNIZED_CALLBACK,
        }
    }

    /// Whether the district keyboard stays under the edited message
    pub fn keeps_menu(&self) -> bool {
        !matches!(self, CallbackReply::Ranking(_))
    }
}

/// Reply for a callback payload
pub async fn callback_reply(data: &str, policy: CallbackMatch, favorites: &FavoritesService) -> CallbackReply {
    match District::from_callback(data, policy) {
        Some(district) => match favorites.reply_for(district).await {
            Ok(text) => CallbackReply::Ranking(text),
            Err(_) => CallbackReply::Unavailable,
        },
        None => {
            warn!(data = %data, "Unrecognized callback payload");
            CallbackReply::Unrecognized
        }
    }
}

/// Handle callback queries from the district keyboard
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    favorites: Arc<FavoritesService>,
    policy: CallbackMatch,
) -> Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    debug!(user_id = %q.from.id, data = %data, "Received callback query from user");

    // Answer before the lookup; Telegram rejects late answers
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
    }

    let reply = callback_reply(data, policy, &favorites).await;

    match &q.message {
        Some(msg) => {
            let edit = bot.edit_message_text(msg.chat().id, msg.id(), reply.text());
            let sent = if reply.keeps_menu() {
                edit.reply_markup(create_district_keyboard()).await
            } else {
                edit.await
            };
            if let Err(e) = sent {
                error!(user_id = %q.from.id, error = %e, "Failed to edit message with favorites");
            }
        }
        None => {
            // Inline-mode callbacks carry no message; reply in the private chat
            let send = bot.send_message(ChatId(q.from.id.0 as i64), reply.text());
            let sent = if reply.keeps_menu() {
                send.reply_markup(create_district_keyboard()).await
            } else {
                send.await
            };
            if let Err(e) = sent {
                error!(user_id = %q.from.id, error = %e, "Failed to send favorites");
            }
        }
    }

    Ok(())
}
