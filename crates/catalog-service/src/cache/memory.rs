//! In-memory cache double for unit tests.

use super::CacheInterface;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    failing: bool,
}

impl MemoryCache {
    /// A cache whose every operation errors.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn check(&self) -> CatalogResult<()> {
        if self.failing {
            Err(CatalogError::cache("connection refused"))
        } else {
            Ok(())
        }
    }
}

fn glob_prefix(pattern: &str) -> &str {
    pattern.trim_end_matches('*')
}

#[async_trait]
impl CacheInterface for MemoryCache {
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str, _ttl: Duration) -> CatalogResult<()> {
        self.check()?;
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        self.check()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> CatalogResult<u64> {
        self.check()?;
        let prefix = glob_prefix(pattern);
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    async fn db_size(&self) -> CatalogResult<i64> {
        self.check()?;
        Ok(self.len() as i64)
    }

    async fn info(&self) -> CatalogResult<String> {
        self.check()?;
        Ok("# Server\r\nredis_version:memory\r\n".to_string())
    }

    async fn flush(&self) -> CatalogResult<()> {
        self.check()?;
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn close(&self) {}
}
