//! Cache round-trip probe used by the health endpoint.

use super::{CacheExt, CacheInterface};
use std::fmt;
use std::time::Duration;
use tracing::{error, warn};

/// Key written by the probe.
pub const HEALTH_CHECK_KEY: &str = "health_check";

/// Value written and read back by the probe.
pub const HEALTH_CHECK_VALUE: &str = "ok";

const PROBE_TTL: Duration = Duration::from_secs(60);

/// The step at which a cache probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    Set,
    Get,
    Mismatch,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Set => "Cache is unhealthy - set operation failed",
            Self::Get => "Cache is unhealthy - get operation failed",
            Self::Mismatch => "Cache is unhealthy - value mismatch",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ProbeFailure {}

/// Writes, reads back and deletes the probe key.
///
/// A failed cleanup is logged but does not fail the probe.
///
/// # Errors
///
/// Returns the first step that failed.
pub async fn probe(cache: &dyn CacheInterface) -> Result<(), ProbeFailure> {
    if let Err(e) = cache.set(HEALTH_CHECK_KEY, &HEALTH_CHECK_VALUE, PROBE_TTL).await {
        error!(error = %e, "cache health check failed - set operation");
        return Err(ProbeFailure::Set);
    }

    let read = cache.get::<String>(HEALTH_CHECK_KEY).await.map_err(|e| {
        error!(error = %e, "cache health check failed - get operation");
        ProbeFailure::Get
    })?;

    if let Err(e) = cache.delete(HEALTH_CHECK_KEY).await {
        warn!(error = %e, "failed to delete health check key");
    }

    if read.as_deref() != Some(HEALTH_CHECK_VALUE) {
        error!("cache health check failed - value mismatch");
        return Err(ProbeFailure::Mismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::RedisCacheService;

    #[tokio::test]
    async fn test_probe_round_trip_cleans_up() {
        let cache = MemoryCache::default();
        probe(&cache).await.unwrap();
        assert!(!cache.contains(HEALTH_CHECK_KEY));
    }

    #[tokio::test]
    async fn test_probe_on_disabled_cache_reports_mismatch() {
        // A disabled cache accepts the write but never returns it.
        let cache = RedisCacheService::disabled();
        assert_eq!(probe(&cache).await, Err(ProbeFailure::Mismatch));
    }

    #[tokio::test]
    async fn test_probe_set_failure() {
        let cache = MemoryCache::failing();
        assert_eq!(probe(&cache).await, Err(ProbeFailure::Set));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(ProbeFailure::Get.to_string(), "Cache is unhealthy - get operation failed");
    }
}
