//! Cache-aside helpers shared by the services.
//!
//! Cache failures are logged and swallowed here; they never fail a request.

use crate::cache::{CacheExt, CacheInterface, DEFAULT_TTL};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Looks `key` up. Errors and undecodable entries count as a miss.
pub(crate) async fn lookup<T>(cache: &dyn CacheInterface, key: &str) -> Option<T>
where
    T: DeserializeOwned + Send,
{
    match cache.get::<T>(key).await {
        Ok(Some(value)) => {
            debug!("Cache hit for {}", key);
            Some(value)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "cache read failed, falling back to the database");
            None
        }
    }
}

/// Stores `value` under `key` with the default TTL.
pub(crate) async fn store<T>(cache: &dyn CacheInterface, key: &str, value: &T)
where
    T: Serialize + Send + Sync,
{
    if let Err(e) = cache.set(key, value, DEFAULT_TTL).await {
        warn!(key, error = %e, "failed to cache value");
    }
}

/// Drops every entry matching `pattern`, then `key` if given.
pub(crate) async fn invalidate(cache: &dyn CacheInterface, pattern: &str, key: Option<&str>) {
    if let Err(e) = cache.delete_pattern(pattern).await {
        warn!(pattern, error = %e, "failed to invalidate cache pattern");
    }

    if let Some(key) = key {
        if let Err(e) = cache.delete(key).await {
            warn!(key, error = %e, "failed to invalidate cache key");
        }
    }
}
