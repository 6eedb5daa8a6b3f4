use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::info;

use matjip_bot::bot;
use matjip_bot::config::BotConfig;
use matjip_bot::db::{self, PgRecordSource, RecordSource};
use matjip_bot::favorites::FavoritesService;
use matjip_bot::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Seoul favorites bot");

    let config = BotConfig::from_env().context("Invalid configuration")?;

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;
    db::init_database_schema(&pool)
        .await
        .context("Failed to initialize database schema")?;

    let source: Arc<dyn RecordSource> = Arc::new(PgRecordSource::new(pool.clone()));
    let favorites = Arc::new(FavoritesService::new(
        source,
        config.recovery.clone(),
        config.search_url_template.clone(),
    ));

    let bot = Bot::new(&config.bot_token);

    info!(
        callback_match = ?config.callback_match,
        lookup_budget_ms = config.recovery.worst_case_lookup().as_millis() as u64,
        "Bot initialized, starting dispatcher"
    );

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![favorites, config.callback_match])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    pool.close().await;
    info!("Dispatcher stopped, database pool closed");

    Ok(())
}
