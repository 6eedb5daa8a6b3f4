//! Intent routing for free-text messages.
//!
//! Pure substring containment, checked in a fixed order: the greeting wins
//! over the farewell when a message carries both.

use crate::messages::{FAREWELL_REPLY, FAREWELL_TRIGGER, GREETING_HINT, GREETING_TRIGGER};

/// Telegram clients send this on first contact
pub const START_COMMAND: &str = "/start";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reply with the greeting and the district keyboard
    ShowMenu,
    /// Reply with fixed text and no keyboard
    SendCanned(&'static str),
}

pub fn route(text: &str) -> Action {
    if text.contains(GREETING_TRIGGER) || text.trim() == START_COMMAND {
        Action::ShowMenu
    } else if text.contains(FAREWELL_TRIGGER) {
        Action::SendCanned(FAREWELL_REPLY)
    } else {
        Action::SendCanned(GREETING_HINT)
    }
}
