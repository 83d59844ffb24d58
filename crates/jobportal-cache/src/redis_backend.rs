//! Redis cache backend.

use crate::CacheBackend;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use jobportal_config::RedisConfig;
use jobportal_core::{JobPortalError, JobPortalResult};
use std::time::Duration;
use tracing::{debug, info};

/// Redis-backed cache.
///
/// Every key is stored under `key_prefix`, so prefix deletes and `clear`
/// never touch data owned by other applications sharing the instance.
pub struct RedisBackend {
    pool: Pool,
    key_prefix: String,
}

impl RedisBackend {
    /// Builds the connection pool.
    ///
    /// No connection is opened here; call [`CacheBackend::ping`] to probe.
    pub fn connect(config: &RedisConfig) -> JobPortalResult<Self> {
        info!("Creating Redis connection pool for response cache...");

        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| JobPortalError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .recycle_timeout(Some(config.connect_timeout()))
            .build()
            .map_err(|e| JobPortalError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self {
            pool,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> JobPortalResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| JobPortalError::cache(format!("Failed to get Redis connection: {}", e)))
    }
}

/// `PSETEX` expiry for `ttl`. Redis rejects zero, so the floor is 1ms.
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Escapes glob metacharacters so `KEYS` matches `literal` verbatim.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> JobPortalResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(self.namespaced(key)).await.map_err(|e| {
            JobPortalError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> JobPortalResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_ms = expiry_millis(ttl);

        conn.pset_ex::<_, _, ()>(self.namespaced(key), value, ttl_ms)
            .await
            .map_err(|e| JobPortalError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' in Redis with TTL {}ms", key, ttl_ms);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> JobPortalResult<u64> {
        let mut conn = self.get_conn().await?;
        let pattern = format!("{}*", escape_glob(&self.namespaced(prefix)));

        // KEYS blocks Redis for the scan; the cache namespace is small.
        let keys: Vec<String> = deadpool_redis::redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| JobPortalError::cache(format!("Failed to scan keys: {}", e)))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| JobPortalError::cache(format!("Failed to delete keys: {}", e)))?;

        debug!("Deleted {} Redis keys matching '{}'", deleted, pattern);
        Ok(u64::try_from(deleted).unwrap_or(0))
    }

    async fn clear(&self) -> JobPortalResult<()> {
        self.delete_by_prefix("").await.map(|_| ())
    }

    async fn ping(&self) -> JobPortalResult<()> {
        let mut conn = self.get_conn().await?;
        deadpool_redis::redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| JobPortalError::cache(format!("Redis PING failed: {}", e)))?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.pool.close();
        info!("Redis connection pool closed");
    }
}
