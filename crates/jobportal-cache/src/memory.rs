//! In-process cache backend.

use crate::CacheBackend;
use async_trait::async_trait;
use jobportal_core::JobPortalResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Map-backed cache with lazy expiry.
///
/// Expired entries are dropped when read and by [`InMemoryBackend::purge_expired`].
/// Uses tokio's clock so paused-time tests can drive expiry.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn get_sync(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock; a concurrent set may have refreshed it.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            debug!("Expired key '{}'", key);
        }
        None
    }

    fn delete_by_prefix_sync(&self, prefix: &str) -> u64 {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        (before - entries.len()) as u64
    }
}

#[async_trait]
impl CacheBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> JobPortalResult<Option<String>> {
        Ok(self.get_sync(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> JobPortalResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> JobPortalResult<u64> {
        Ok(self.delete_by_prefix_sync(prefix))
    }

    async fn clear(&self) -> JobPortalResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    async fn ping(&self) -> JobPortalResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let backend = InMemoryBackend::new();
        backend.set("k", "v", Duration::from_secs(2)).await.unwrap();

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(backend.get("k").await.unwrap(), Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(backend.get("k").await.unwrap(), None);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let backend = InMemoryBackend::new();
        backend.set("k", "old", Duration::from_secs(60)).await.unwrap();
        backend.set("k", "new", Duration::from_secs(60)).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some("new".to_string()));
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_prefix() {
        let backend = InMemoryBackend::new();
        let ttl = Duration::from_secs(60);
        backend.set("/api/v1/job/get|guest-guest", "a", ttl).await.unwrap();
        backend.set("/api/v1/job/get/:id|guest-guest-7", "b", ttl).await.unwrap();
        backend.set("/api/v1/company/get|guest-guest", "c", ttl).await.unwrap();

        assert_eq!(backend.delete_by_prefix("/api/v1/job/get").await.unwrap(), 2);
        assert_eq!(backend.delete_by_prefix("/api/v1/job/get").await.unwrap(), 0);
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let backend = InMemoryBackend::new();
        backend.set("short", "1", Duration::from_secs(1)).await.unwrap();
        backend.set("long", "2", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(backend.purge_expired(), 1);
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let backend = InMemoryBackend::new();
        backend.set("a", "1", Duration::from_secs(60)).await.unwrap();
        backend.clear().await.unwrap();
        assert!(backend.is_empty());
    }
}
