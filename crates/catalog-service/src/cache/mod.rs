//! Caching infrastructure for the service layer.
//!
//! A small cache abstraction with a Redis implementation. Values are JSON
//! strings stored under `"<entity>:<id>"` keys.

mod cache_interface;
pub mod cache_keys;
mod health;
mod redis_cache;

#[cfg(test)]
pub(crate) mod memory;

pub use cache_interface::{CacheExt, CacheInterface};
pub use health::{probe, ProbeFailure, HEALTH_CHECK_KEY, HEALTH_CHECK_VALUE};
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters, DEFAULT_TTL};
