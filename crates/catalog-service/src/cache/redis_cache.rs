//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use catalog_config::RedisConfig;
use catalog_core::{CatalogError, CatalogResult};
use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// TTL for cached entity details (30 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Redis-based cache service.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool. `None` disables caching.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a cache service over an existing pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub const fn disabled() -> Self {
        Self { pool: None }
    }

    /// Build the pool from configuration and verify it with a `PING`.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for a bad URL and a `Cache` error when
    /// the server does not answer within the connect timeout.
    pub async fn connect(config: &RedisConfig) -> CatalogResult<Self> {
        if !config.enabled {
            info!("Redis cache disabled");
            return Ok(Self::disabled());
        }

        info!("Creating Redis connection pool for {}:{}", config.host, config.port);

        let pool = Config::from_url(config.url())
            .builder()
            .map_err(|e| CatalogError::configuration(format!("Invalid Redis config: {e}")))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| CatalogError::configuration(format!("Failed to create Redis pool: {e}")))?;

        let ping = async {
            let mut conn = pool
                .get()
                .await
                .map_err(|e| CatalogError::cache(format!("Failed to get Redis connection: {e}")))?;
            deadpool_redis::redis::cmd("PING")
                .query_async::<String>(&mut *conn)
                .await
                .map_err(|e| CatalogError::cache(format!("Redis ping failed: {e}")))
        };

        tokio::time::timeout(config.connect_timeout(), ping)
            .await
            .map_err(|_| CatalogError::Timeout("Timed out connecting to Redis".to_string()))??;

        info!("Redis connection pool created successfully");
        Ok(Self::new(Arc::new(pool)))
    }

    /// Returns the underlying pool, `None` when caching is disabled.
    #[must_use]
    pub fn pool(&self) -> Option<Arc<Pool>> {
        self.pool.clone()
    }

    async fn get_conn(&self) -> CatalogResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| CatalogError::cache(format!("Failed to get Redis connection: {e}"))),
            None => Err(CatalogError::cache("Cache is disabled")),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CatalogError::cache(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CatalogError::cache(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CatalogError::cache(format!("Failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> CatalogResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;

        // KEYS then DEL is not atomic; keys written in between survive until their TTL.
        let keys: Vec<String> = deadpool_redis::redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut *conn)
            .await
            .map_err(|e| CatalogError::cache(format!("Failed to list keys '{pattern}': {e}")))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn
            .del(&keys)
            .await
            .map_err(|e| CatalogError::cache(format!("Failed to delete keys: {e}")))?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }

    async fn db_size(&self) -> CatalogResult<i64> {
        let mut conn = self.get_conn().await?;
        deadpool_redis::redis::cmd("DBSIZE")
            .query_async(&mut *conn)
            .await
            .map_err(|e| CatalogError::cache(format!("DBSIZE failed: {e}")))
    }

    async fn info(&self) -> CatalogResult<String> {
        let mut conn = self.get_conn().await?;
        deadpool_redis::redis::cmd("INFO")
            .query_async(&mut *conn)
            .await
            .map_err(|e| CatalogError::cache(format!("INFO failed: {e}")))
    }

    async fn flush(&self) -> CatalogResult<()> {
        let mut conn = self.get_conn().await?;
        deadpool_redis::redis::cmd("FLUSHDB")
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| CatalogError::cache(format!("FLUSHDB failed: {e}")))
    }

    fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Redis connection pool closed");
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.pool.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        assert_eq!(DEFAULT_TTL.as_secs(), 1800);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
        assert_eq!(cache.get_raw("product:1").await.unwrap(), None);
        cache.set_raw("product:1", "{}", DEFAULT_TTL).await.unwrap();
        assert!(!cache.delete("product:1").await.unwrap());
        assert_eq!(cache.delete_pattern("product:*").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_disabled_cache_reports_stats_errors() {
        let cache = RedisCacheService::disabled();
        assert!(cache.db_size().await.is_err());
        assert!(cache.flush().await.is_err());
        cache.close();
    }

    #[tokio::test]
    async fn test_connect_honours_enabled_flag() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        let cache = RedisCacheService::connect(&config).await.unwrap();
        assert!(!cache.is_enabled());
    }
}
