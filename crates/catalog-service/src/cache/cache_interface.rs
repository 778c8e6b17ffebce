//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use catalog_core::CatalogResult;
use shaku::Interface;
use std::time::Duration;

/// Cache interface for storing and retrieving cached data.
///
/// Uses JSON strings for type-erased storage to keep the trait dyn-compatible.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> CatalogResult<bool>;

    /// Delete every key matching a glob pattern.
    ///
    /// Returns the number of keys deleted. No match is not an error.
    async fn delete_pattern(&self, pattern: &str) -> CatalogResult<u64>;

    /// Number of keys in the selected database.
    async fn db_size(&self) -> CatalogResult<i64>;

    /// Server information as reported by `INFO`.
    async fn info(&self) -> CatalogResult<String>;

    /// Remove every key from the selected database.
    async fn flush(&self) -> CatalogResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;

    /// Close the underlying connections. Later calls fail.
    fn close(&self);
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> CatalogResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CatalogResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
