//! Callback query handlers module
//!
//! This module routes inline keyboard button callbacks

use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::{debug, info, warn};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::{ScenarioManager, StateStorage};
use crate::i18n::I18n;
use crate::handlers::commands::{create_user, start};
use crate::handlers::keyboards::{BACK_MENU_CALLBACK, CREATE_USER_CALLBACK};
use crate::middleware::{PermissionGuard, CREATE_USER_PERMISSIONS};

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    scenario_manager: ScenarioManager,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query.message.as_ref().map(|m| m.chat().id);

    debug!(user_id = user_id, chat_id = ?chat_id, callback_data = ?query.data, "Processing callback query");

    match query.data.as_deref() {
        Some(CREATE_USER_CALLBACK) => {
            create_user::handle_start_conversation(
                bot, query, services, scenario_manager, state_storage, i18n,
            )
            .await
        }
        Some(BACK_MENU_CALLBACK) => handle_back_menu(bot, query, services, state_storage, i18n).await,
        other => {
            warn!(user_id = user_id, callback_data = ?other, "Unknown callback data");
            bot.answer_callback_query(query.id.clone()).await?;
            Ok(())
        }
    }
}

/// Back button: drop any open conversation and show the main menu again
async fn handle_back_menu(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let lang = i18n.detect_user_language(query.from.language_code.as_deref());

    let guard = PermissionGuard::require_any(&services.auth_service, CREATE_USER_PERMISSIONS);
    let Some(context) = guard.check_callback(&bot, &query, &i18n).await? else {
        return Ok(());
    };

    bot.answer_callback_query(query.id.clone()).await?;

    if state_storage.delete_context(user_id).await? {
        info!(user_id = user_id, "Abandoned open conversation on back button");
    }

    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    start::show_main_menu(&bot, chat_id, &context, &services, &i18n, &lang).await
}
