//! Bot module for handling Telegram interactions
//!
//! - `message_handler`: routes free-text messages
//! - `callback_handler`: handles district selections from the inline keyboard
//! - `ui_builder`: creates the district keyboard

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

pub use callback_handler::{callback_handler, callback_reply, CallbackReply};
pub use message_handler::message_handler;
pub use ui_builder::create_district_keyboard;

/// Update routing tree.
///
/// Expects `Arc<FavoritesService>` and `CallbackMatch` in the dependency map.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
