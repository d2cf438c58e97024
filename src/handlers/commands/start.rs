//! Start command handler
//!
//! Handles /start and /menu and renders the main menu

use teloxide::{Bot, types::{ChatId, Message, ParseMode}, prelude::*};
use tracing::{debug, info};
use crate::utils::errors::{BotError, Result};
use crate::services::{AuthContext, ServiceFactory};
use crate::state::StateStorage;
use crate::i18n::{I18n, params};
use crate::handlers::keyboards::main_menu_keyboard;
use crate::middleware::{PermissionGuard, CREATE_USER_PERMISSIONS};

/// Handle /start and /menu
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;
    let lang = i18n.detect_user_language(user.language_code.as_deref());

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    let guard = PermissionGuard::require_any(&services.auth_service, CREATE_USER_PERMISSIONS);
    let Some(context) = guard.check_message(&bot, &msg, &i18n).await? else {
        return Ok(());
    };

    if state_storage.delete_context(user_id).await? {
        info!(user_id = user_id, "Abandoned open conversation on menu");
    }

    show_main_menu(&bot, chat_id, &context, &services, &i18n, &lang).await
}

/// Send the main menu; dealers also see their remaining quota
pub async fn show_main_menu(
    bot: &Bot,
    chat_id: ChatId,
    context: &AuthContext,
    services: &ServiceFactory,
    i18n: &I18n,
    lang: &str,
) -> Result<()> {
    let mut text = i18n.t("menu.title", lang, None);

    if context.is_dealer() {
        if let Some(limit) = services.dealer_service.remaining_quota(context.user_id).await? {
            text.push_str("\n\n");
            text.push_str(&i18n.t("menu.quota", lang, Some(&params(&[("limit", limit)]))));
        }
    }

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(main_menu_keyboard(i18n, lang))
        .await?;

    info!(user_id = context.user_id, "Main menu shown");
    Ok(())
}
