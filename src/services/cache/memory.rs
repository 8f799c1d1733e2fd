use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process cache backend (per instance).
///
/// Expired entries are evicted when read, and swept on every write so keys
/// that are never read again do not accumulate.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }

        // Read guard is released by now. Re-check under the write lock so a value
        // set concurrently is not evicted.
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| CacheError::InvalidValue(format!("ttl out of range: {ttl:?}")))?;

        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}
