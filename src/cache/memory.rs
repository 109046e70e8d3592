use super::{CacheResult, KeyValueCache};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// Cache entry with optional expiration
#[derive(Clone, Debug)]
struct CacheEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn new(value: &str, ttl: Option<Duration>) -> Self {
        // A TTL too large for chrono is treated as no expiry
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        Self {
            value: value.to_string(),
            expires_at,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }
}

/// Process-local cache backend.
///
/// Cloning is cheap and clones share the same storage. Expired entries are
/// dropped when read, and [`run_cache_cleanup`] sweeps the rest.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every expired entry
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Utc::now();
        // remove_if takes the shard lock, so the expiry check and removal are atomic
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            return Ok(None);
        }
        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Utc::now();
        Ok(self
            .entries
            .remove(key)
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.value))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Background task to periodically sweep expired entries
pub async fn run_cache_cleanup(cache: MemoryCache, interval_seconds: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        cache.purge_expired();
        tracing::debug!(remaining = cache.len(), "Memory cache cleanup complete");
    }
}
