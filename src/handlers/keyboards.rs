//! Inline keyboards shared by handlers

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::i18n::I18n;

/// Callback data of the main-menu "create user" button
pub const CREATE_USER_CALLBACK: &str = "create_user";

/// Callback data of the back-menu button
pub const BACK_MENU_CALLBACK: &str = "back_menu";

/// Single "back" button returning to the main menu
pub fn back_menu_keyboard(i18n: &I18n, lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        i18n.t("menu.back_button", lang, None),
        BACK_MENU_CALLBACK,
    )]])
}

/// Main menu shown to admins and dealers
pub fn main_menu_keyboard(i18n: &I18n, lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        i18n.t("menu.create_user_button", lang, None),
        CREATE_USER_CALLBACK,
    )]])
}
