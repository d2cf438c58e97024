//! ProvisionBot Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::{CallbackQuery, ChatId, Update}};
use teloxide::dispatching::UpdateHandler;
use teloxide::update_listeners::Polling;
use tracing::{info, warn, error};

use ProvisionBot::{
    config::Settings,
    utils::{logging, UserValidator},
    database::{DatabaseService, connection::{create_pool, run_migrations}},
    services::ServiceFactory,
    state::{ScenarioManager, StateStorage},
    i18n::I18n,
    middleware::LoggingMiddleware,
    handlers::{Command, handle_command, handle_callback_query, handle_message, report_failure},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on drop
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ProvisionBot::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);

    // Initialize i18n system
    info!("Loading translations...");
    let i18n = I18n::load(&settings.i18n).await?;

    // Initialize state management
    info!(backend = ?settings.state.backend, "Initializing conversation state storage...");
    let state_storage = StateStorage::new(&settings.state).await?;
    let scenario_manager = ScenarioManager::new(
        UserValidator::from_config(&settings.provisioning),
        settings.provisioning.conversation_timeout_seconds,
    );

    // Initialize services
    let services = ServiceFactory::new(&settings, &database_service);

    let bot = Bot::new(&settings.bot.token);

    let services_arc = Arc::new(services);
    let scenario_manager_arc = Arc::new(scenario_manager);
    let state_storage_arc = Arc::new(state_storage);
    let i18n_arc = Arc::new(i18n);
    let logger_arc = Arc::new(LoggingMiddleware::default());

    let mut dispatcher = Dispatcher::builder(bot.clone(), create_handler())
        .dependencies(dptree::deps![
            services_arc,
            scenario_manager_arc,
            state_storage_arc,
            i18n_arc,
            logger_arc
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build();

    info!("ProvisionBot is ready, starting polling...");

    // Updates queued while the bot was offline are discarded
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    info!("ProvisionBot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::filter(|update: Update, logger: Arc<LoggingMiddleware>| {
        logger.log_update(&update);
        true
    })
    .branch(
        Update::filter_message()
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_commands),
            )
            .branch(
                // Conversation replies and other text
                dptree::endpoint(handle_messages),
            ),
    )
    .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
    i18n: Arc<I18n>,
    logger: Arc<LoggingMiddleware>,
) -> HandlerResult {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64);
    let chat_id = msg.chat.id;
    let language_code = msg.from.as_ref().and_then(|u| u.language_code.clone());

    if let Err(e) = handle_command(
        bot.clone(),
        msg,
        cmd,
        (*services).clone(),
        (*state_storage).clone(),
        (*i18n).clone(),
    )
    .await
    {
        logger.log_error(&e, "command", user_id);
        notify_failure(&bot, chat_id, &i18n, language_code.as_deref()).await;
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
    i18n: Arc<I18n>,
    logger: Arc<LoggingMiddleware>,
) -> HandlerResult {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64);
    let chat_id = msg.chat.id;
    let language_code = msg.from.as_ref().and_then(|u| u.language_code.clone());

    if let Err(e) = handle_message(
        bot.clone(),
        msg,
        (*services).clone(),
        (*scenario_manager).clone(),
        (*state_storage).clone(),
        (*i18n).clone(),
    )
    .await
    {
        logger.log_error(&e, "message", user_id);
        notify_failure(&bot, chat_id, &i18n, language_code.as_deref()).await;
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    scenario_manager: Arc<ScenarioManager>,
    state_storage: Arc<StateStorage>,
    i18n: Arc<I18n>,
    logger: Arc<LoggingMiddleware>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;
    let chat_id = query.message.as_ref().map(|m| m.chat().id);
    let language_code = query.from.language_code.clone();

    if let Err(e) = handle_callback_query(
        bot.clone(),
        query,
        (*services).clone(),
        (*scenario_manager).clone(),
        (*state_storage).clone(),
        (*i18n).clone(),
    )
    .await
    {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        logger.log_error(&e, "callback", Some(user_id));
        if let Some(chat_id) = chat_id {
            notify_failure(&bot, chat_id, &i18n, language_code.as_deref()).await;
        }
        return Err(e.into());
    }

    Ok(())
}

/// Send the generic error text; a failure here is only logged
async fn notify_failure(bot: &Bot, chat_id: ChatId, i18n: &I18n, language_code: Option<&str>) {
    if let Err(e) = report_failure(bot, chat_id, i18n, language_code).await {
        warn!(chat_id = chat_id.0, error = %e, "Failed to report handler error");
    }
}
