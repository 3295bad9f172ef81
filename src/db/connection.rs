//! Database connection management
//!
//! Provides database connection pooling, embedded migrations, and health
//! checks.

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// Embedded schema migrations, applied on startup and in tests
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Arc<DatabasePool>,
}

impl DatabaseConnection {
    /// Create a new database connection from a connection string
    ///
    /// # Arguments
    /// * `database_url` - SQLite connection string (e.g., "sqlite:checkpoints.db?mode=rwc"
    ///   or "sqlite::memory:")
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_url, 5).await
    }

    /// Create a new database connection with a custom pool size
    pub async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Run embedded migrations on the database
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(self.pool.as_ref()).await
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    ///
    /// After this is called the connection cannot be used anymore.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
