//! Database connection pool management.

use async_trait::async_trait;
use catalog_config::DatabaseConfig;
use catalog_core::{CatalogError, CatalogResult, Interface};
use shaku::Component;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{info, warn};

/// Interface for database pool operations.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns a reference to the underlying MySQL pool.
    fn inner(&self) -> &MySqlPool;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> CatalogResult<()>;

    /// Runs database migrations.
    async fn run_migrations(&self) -> CatalogResult<()>;

    /// Closes the pool, waiting for checked-out connections to return.
    async fn close(&self);
}

/// Database pool wrapper.
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connects a new pool using the configured limits.
    pub async fn connect(config: &DatabaseConfig) -> CatalogResult<Self> {
        info!(host = %config.host, database = %config.name, "Connecting to MySQL database...");

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .max_lifetime(Some(config.max_lifetime()))
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url())
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                CatalogError::Database(format!("Failed to connect: {e}"))
            })?;

        info!("MySQL connection pool established");
        Ok(Self { pool })
    }

    /// Wraps a pre-existing pool.
    #[must_use]
    pub const fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(format!("Health check failed: {e}")))?;
        Ok(())
    }

    async fn run_migrations(&self) -> CatalogResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}
