use super::{CacheError, CacheResult, KeyValueCache};
use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use std::time::Duration;

/// Redis cache backend.
///
/// Holds a single multiplexed connection; clones share it. Keys are stored
/// with an optional prefix so several services can share one database.
#[derive(Clone)]
pub struct RedisCache {
    connection: MultiplexedConnection,
    key_prefix: String,
}

impl RedisCache {
    /// Open a client, connect, and verify the server answers `PING`.
    pub async fn connect(redis_url: &str, key_prefix: String) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Redis client creation failed: {}", e)))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis connection failed: {}", e)))?;

        let cache = Self {
            connection,
            key_prefix,
        };
        cache.health_check().await?;
        Ok(cache)
    }

    /// Test Redis connectivity
    pub async fn health_check(&self) -> CacheResult<()> {
        let mut conn = self.connection.clone();
        let _pong: String = ::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Connection(format!("Redis ping failed: {}", e)))?;
        Ok(())
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let key = self.prefixed_key(key);
        let mut conn = self.connection.clone();

        match ttl {
            // PSETEX keeps value and expiry in one command
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                let _: () = conn
                    .pset_ex(&key, value, millis)
                    .await
                    .map_err(|e| CacheError::Backend(e.to_string()))?;
            }
            None => {
                let _: () = conn
                    .set(&key, value)
                    .await
                    .map_err(|e| CacheError::Backend(e.to_string()))?;
            }
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.prefixed_key(key);
        let mut conn = self.connection.clone();

        conn.get(&key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let key = self.prefixed_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .del(&key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }

    // GETDEL needs Redis 6.2 or newer
    async fn take(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.prefixed_key(key);
        let mut conn = self.connection.clone();

        conn.get_del(&key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
