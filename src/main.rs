//! Roleplay API
//!
//! Main application entry point

use std::sync::Arc;
use tracing::info;

use roleplay_api::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::{create_pool, run_migrations, DatabaseConfig}},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", roleplay_api::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;
    run_migrations(&db_pool).await?;

    let database_service = Arc::new(DatabaseService::new(db_pool));
    let state = AppState::new(&settings, database_service);

    server::serve(&settings, state).await?;

    info!("{} has been shut down.", roleplay_api::NAME);
    Ok(())
}
