//! Command handlers module
//! 
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod start;
pub mod help;
pub mod create_user;
pub mod dealers;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::StateStorage;
use crate::i18n::I18n;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "ProvisionBot commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
    #[command(description = "Show the main menu")]
    Menu,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Create a user: <username> <password> <limit> <days>")]
    CreateUser(String),
    #[command(description = "Cancel the current operation")]
    Cancel,
    #[command(description = "Show your remaining account creation limit")]
    Quota,
    #[command(description = "Create or update a dealer: <telegram_id> <limit> (admin only)")]
    AddDealer(String),
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    match cmd {
        Command::Start | Command::Menu => start::handle_start(bot, msg, services, state_storage, i18n).await,
        Command::Help => help::handle_help(bot, msg, i18n).await,
        Command::CreateUser(args) => {
            create_user::handle_create_user_command(bot, msg, args, services, i18n).await
        }
        Command::Cancel => create_user::handle_cancel(bot, msg, state_storage, i18n).await,
        Command::Quota => dealers::handle_quota(bot, msg, services, i18n).await,
        Command::AddDealer(args) => dealers::handle_add_dealer(bot, msg, args, services, i18n).await,
    }
}
