//! RosterBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error, debug};

use RosterBuddy::{
    config::Settings,
    utils::logging,
    services::ServiceFactory,
    middleware::LoggingMiddleware,
    i18n::I18n,
    handlers::{Command, handle_command, handle_callback_query},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", RosterBuddy::info());
    info!(allowed_chats = ?settings.bot.allowed_chat_ids, "Allowed chats");

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;

    // Initialize services and restore the last snapshot
    info!(backend = ?settings.storage.backend, "Initializing services...");
    let services = ServiceFactory::new(&settings, &i18n).await?;

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            warn!(issue = %issue, "Service health issue");
        }
    }

    let flusher = services
        .roster_service
        .start_flusher(Duration::from_secs(settings.storage.flush_interval_seconds));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![
            Arc::new(services.clone()),
            Arc::new(i18n),
            Arc::new(LoggingMiddleware::default())
        ])
        .default_handler(|upd| async move {
            debug!(update_id = upd.id.0, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("An error has occurred in the dispatcher"))
        .enable_ctrlc_handler()
        .build();

    info!("RosterBuddy bot is ready, starting polling...");
    dispatcher.dispatch().await;

    // Persist whatever changed since the last periodic flush
    flusher.abort();
    if let Err(e) = services.roster_service.flush().await {
        error!(error = %e, "Final snapshot flush failed");
        return Err(e.into());
    }

    info!("RosterBuddy bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .inspect(|update: Update, logging: Arc<LoggingMiddleware>| logging.log_update(&update))
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_commands),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    i18n: Arc<I18n>,
    logging: Arc<LoggingMiddleware>,
) -> HandlerResult {
    let services = (*services).clone();
    let i18n = (*i18n).clone();
    let logging = (*logging).clone();

    if let Err(e) = handle_command(bot, msg, cmd, services, logging, i18n).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<ServiceFactory>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    let services = (*services).clone();
    let i18n = (*i18n).clone();

    if let Err(e) = handle_callback_query(bot, query, services, i18n).await {
        error!(user_id = user_id, error = %e, severity = %e.severity(), "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
