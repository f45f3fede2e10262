//! Test database helper utilities
//!
//! PostgreSQL tests run against the database named by `TEST_DATABASE_URL`.
//! When the variable is unset the helper returns `None` and the calling test
//! returns early.

use std::sync::Once;
use sqlx::PgPool;
use roleplay_api::database::connection::run_migrations;
use roleplay_api::DatabaseService;

static INIT: Once = Once::new();

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
    pub service: DatabaseService,
}

impl TestDatabase {
    /// Connect, migrate and empty the test database
    pub async fn from_env() -> Option<Self> {
        // Initialize logging once
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt::try_init();
        });

        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        };

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let db = Self {
            service: DatabaseService::new(pool.clone()),
            pool,
        };
        db.cleanup().await.expect("Failed to clean test database");

        Some(db)
    }

    /// Clean all test data from the database
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        // Delete in reverse order of dependencies
        sqlx::query("DELETE FROM groups_requests").execute(&self.pool).await?;
        sqlx::query("DELETE FROM groups_players").execute(&self.pool).await?;
        sqlx::query("DELETE FROM groups").execute(&self.pool).await?;
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;

        Ok(())
    }
}
