//! Keyed ephemeral cache used for OAuth state and short-lived credentials.
//!
//! Every value is a string stored under a string key with an optional
//! time-to-live. Two interchangeable backends implement [`KeyValueCache`]:
//!
//! - [`MemoryCache`] - process-local map, entries expire lazily on read
//! - [`RedisCache`] - shared Redis instance, expiry enforced by Redis
//!
//! The backend is chosen once at startup by [`connect`] and injected into the
//! OAuth controller as `Arc<dyn KeyValueCache>`.

mod memory;
mod redis;

pub use self::memory::{run_cache_cleanup, MemoryCache};
pub use self::redis::RedisCache;

use crate::config::CacheConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Cache error types
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache error: {0}")]
    Backend(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unknown cache backend '{0}'")]
    UnknownBackend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// String key/value store with per-entry expiry.
///
/// Implementations must treat an expired entry exactly like a missing one.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// `ttl` of `None` keeps the entry until it is deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Read the value under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove `key` and return its value in one atomic step.
    ///
    /// Of several concurrent takes on the same key at most one sees the value.
    async fn take(&self, key: &str) -> CacheResult<Option<String>>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Build the cache backend described by `config`.
///
/// A Redis backend is connected and pinged up front. When that fails and
/// `fallback_to_memory` is set, a process-local [`MemoryCache`] is returned
/// instead. In-memory backends get a background sweep task when
/// `cleanup_interval_seconds` is non-zero.
pub async fn connect(config: &CacheConfig) -> CacheResult<Arc<dyn KeyValueCache>> {
    match config.backend.as_str() {
        "memory" => {
            info!("Using in-memory cache backend");
            Ok(memory_backend(config))
        }
        "redis" => match RedisCache::connect(&config.redis_url, config.key_prefix.clone()).await {
            Ok(cache) => {
                info!(redis_url = %config.redis_url, "Using redis cache backend");
                Ok(Arc::new(cache))
            }
            Err(e) if config.fallback_to_memory => {
                warn!(
                    error = %e,
                    "Redis server not available, falling back to in-memory cache"
                );
                Ok(memory_backend(config))
            }
            Err(e) => Err(e),
        },
        other => Err(CacheError::UnknownBackend(other.to_string())),
    }
}

fn memory_backend(config: &CacheConfig) -> Arc<dyn KeyValueCache> {
    let cache = MemoryCache::new();
    if config.cleanup_interval_seconds > 0 {
        tokio::spawn(run_cache_cleanup(
            cache.clone(),
            config.cleanup_interval_seconds,
        ));
    }
    Arc::new(cache)
}
