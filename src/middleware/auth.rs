//! Authentication middleware
//! 
//! `PermissionGuard` wraps a handler entry point: it resolves the caller's
//! permissions and, when none of the required ones are held, answers the
//! caller with a denial so the handler can return early.

use teloxide::{Bot, prelude::*, types::{CallbackQuery, Message}};
use tracing::{debug, warn};
use crate::i18n::I18n;
use crate::services::{AuthContext, AuthService, Permission};
use crate::utils::errors::{BotError, Result};

/// Who may create users
pub const CREATE_USER_PERMISSIONS: &[Permission] = &[Permission::Admin, Permission::Dealer];

/// Who may manage dealers
pub const ADMIN_PERMISSIONS: &[Permission] = &[Permission::Admin];

/// Permission guard for handler entry points
#[derive(Debug, Clone, Copy)]
pub struct PermissionGuard<'a> {
    auth: &'a AuthService,
    required: &'a [Permission],
}

impl<'a> PermissionGuard<'a> {
    /// Pass when the caller holds ANY of `required`
    pub fn require_any(auth: &'a AuthService, required: &'a [Permission]) -> Self {
        Self { auth, required }
    }

    /// Resolve the caller's context, `None` when access is denied
    pub async fn authorize(&self, user_id: i64) -> Result<Option<AuthContext>> {
        match self.auth.require_any(user_id, self.required).await {
            Ok(context) => {
                debug!(user_id = user_id, required = ?self.required, "Permission granted");
                Ok(Some(context))
            }
            Err(BotError::PermissionDenied(reason)) => {
                warn!(user_id = user_id, reason = %reason, "Permission denied");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Guard a message handler; replies with the denial text when refused
    pub async fn check_message(&self, bot: &Bot, msg: &Message, i18n: &I18n) -> Result<Option<AuthContext>> {
        let user = msg.from.as_ref().ok_or_else(|| {
            BotError::InvalidInput("No user in message".to_string())
        })?;
        let user_id = user.id.0 as i64;

        let context = self.authorize(user_id).await?;
        if context.is_none() {
            let lang = i18n.detect_user_language(user.language_code.as_deref());
            bot.send_message(msg.chat.id, i18n.t("permission.denied", &lang, None)).await?;
        }

        Ok(context)
    }

    /// Guard a callback handler; answers the query with an alert when refused
    pub async fn check_callback(&self, bot: &Bot, query: &CallbackQuery, i18n: &I18n) -> Result<Option<AuthContext>> {
        let user_id = query.from.id.0 as i64;

        let context = self.authorize(user_id).await?;
        if context.is_none() {
            let lang = i18n.detect_user_language(query.from.language_code.as_deref());
            bot.answer_callback_query(query.id.clone())
                .text(i18n.t("permission.denied", &lang, None))
                .show_alert(true)
                .await?;
        }

        Ok(context)
    }
}
