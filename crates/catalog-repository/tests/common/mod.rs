//! Common test infrastructure for database integration tests.

use catalog_config::DatabaseConfig;
use catalog_repository::{DatabasePool, DatabasePoolInterface};
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::mysql::Mysql;

/// Test database container wrapper.
///
/// Owns a MySQL testcontainer and a migrated pool pointing at it.
pub struct TestDatabase {
    _container: ContainerAsync<Mysql>,
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Starts a fresh MySQL container and runs migrations.
    pub async fn new() -> Self {
        let container = Mysql::default()
            .with_env_var("MYSQL_ROOT_PASSWORD", "testpass")
            .with_env_var("MYSQL_DATABASE", "catalog_test")
            .with_env_var("MYSQL_USER", "catalog")
            .with_env_var("MYSQL_PASSWORD", "catalog")
            .start()
            .await
            .expect("Failed to start MySQL container");

        let port = container
            .get_host_port_ipv4(3306)
            .await
            .expect("Failed to get MySQL port");

        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port,
            user: "catalog".to_string(),
            password: "catalog".to_string(),
            name: "catalog_test".to_string(),
            min_connections: 1,
            max_connections: 5,
            max_lifetime_secs: 60,
            acquire_timeout_secs: 30,
            run_migrations: true,
        };

        let pool = Self::connect_with_retry(&config, 30).await;
        pool.run_migrations().await.expect("Failed to run migrations");

        Self {
            _container: container,
            pool: Arc::new(pool),
        }
    }

    /// Returns the shared pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }

    async fn connect_with_retry(config: &DatabaseConfig, max_attempts: u32) -> DatabasePool {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match DatabasePool::connect(config).await {
                Ok(pool) => return pool,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!("Failed to connect to database after {max_attempts} attempts: {e}");
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}
