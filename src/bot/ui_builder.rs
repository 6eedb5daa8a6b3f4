//! UI Builder module for creating keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::district::District;

/// District selection keyboard; each button's callback token is its label
pub fn create_district_keyboard() -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = District::menu_rows()
        .map(|row| {
            row.iter()
                .map(|district| InlineKeyboardButton::callback(district.label(), district.label()))
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(rows)
}
