//! Backend strategy for the cache store.

use async_trait::async_trait;
use jobportal_core::JobPortalResult;
use std::time::Duration;

/// A key/value store with per-entry TTL.
///
/// Implementations report failures as errors; deciding what a failure
/// means for a request is the job of [`crate::CacheStore`].
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> JobPortalResult<Option<String>>;

    /// Stores `value` under `key` for `ttl`, replacing any existing entry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> JobPortalResult<()>;

    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    async fn delete_by_prefix(&self, prefix: &str) -> JobPortalResult<u64>;

    /// Removes every entry owned by this backend.
    async fn clear(&self) -> JobPortalResult<()>;

    /// Checks that the backend can serve requests.
    async fn ping(&self) -> JobPortalResult<()>;

    /// Releases connections. Further calls may fail.
    async fn shutdown(&self) {}
}
