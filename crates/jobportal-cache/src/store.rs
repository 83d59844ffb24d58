//! The cache store used by the HTTP layer.

use crate::{CacheBackend, InMemoryBackend, RedisBackend};
use jobportal_config::RedisConfig;
use jobportal_core::{JobPortalError, JobPortalResult};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How often expired in-memory entries are purged.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Timeouts and backoff for the remote backend.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Upper bound for any single remote call.
    pub command_timeout: Duration,
    /// Delay before the first retry after a failure.
    pub initial_delay: Duration,
    /// Cap for the doubling retry delay.
    pub max_delay: Duration,
}

impl ReconnectPolicy {
    #[must_use]
    pub fn from_config(config: &RedisConfig) -> Self {
        Self {
            command_timeout: config.command_timeout(),
            initial_delay: config.reconnect_initial_delay(),
            max_delay: config.reconnect_max_delay().max(config.reconnect_initial_delay()),
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from_config(&RedisConfig::default())
    }
}

/// Where session data should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    /// The shared Redis instance.
    Shared,
    /// Process-local storage.
    Local,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub invalidated: u64,
    pub remote_failures: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    invalidated: AtomicU64,
    remote_failures: AtomicU64,
}

enum RemoteStatus {
    Ready,
    /// Failed recently; skip until the retry deadline.
    Backoff,
    /// The caller owns the next probe.
    Probe,
}

struct HealthState {
    ready: bool,
    failures: u32,
    delay: Duration,
    retry_at: Option<Instant>,
}

struct RemoteHealth {
    state: Mutex<HealthState>,
    policy: ReconnectPolicy,
}

impl RemoteHealth {
    fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: Mutex::new(HealthState {
                ready: false,
                failures: 0,
                delay: policy.initial_delay,
                retry_at: None,
            }),
            policy,
        }
    }

    fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    fn status(&self) -> RemoteStatus {
        let mut state = self.state.lock();
        if state.ready {
            return RemoteStatus::Ready;
        }
        let now = Instant::now();
        match state.retry_at {
            Some(at) if now < at => RemoteStatus::Backoff,
            _ => {
                // Push the deadline so concurrent callers do not probe too.
                state.retry_at = Some(now + state.delay);
                RemoteStatus::Probe
            }
        }
    }

    /// Records a successful call. Only a completed probe may move a
    /// not-ready remote back to ready, so this leaves it untouched then.
    fn record_success(&self) {
        let mut state = self.state.lock();
        if state.ready {
            state.failures = 0;
            state.delay = self.policy.initial_delay;
        }
    }

    /// Marks the remote ready after a probe succeeded.
    fn mark_ready(&self) {
        let mut state = self.state.lock();
        state.ready = true;
        state.failures = 0;
        state.delay = self.policy.initial_delay;
        state.retry_at = None;
    }

    fn record_failure(&self) -> Duration {
        let mut state = self.state.lock();
        state.ready = false;
        state.failures = state.failures.saturating_add(1);
        let factor = 2u32.saturating_pow(state.failures - 1);
        state.delay = self
            .policy
            .initial_delay
            .saturating_mul(factor)
            .min(self.policy.max_delay);
        state.retry_at = Some(Instant::now() + state.delay);
        state.delay
    }
}

/// Shared response cache.
///
/// Wraps an optional remote backend and an in-process fallback. Remote
/// failures and timeouts never reach the caller: reads become misses
/// served from the fallback, writes land in the fallback, and the remote is
/// skipped until its backoff deadline passes. A recovered remote has its
/// namespace cleared before it serves reads again, since invalidations
/// issued during the outage never reached it.
pub struct CacheStore {
    remote: Option<Arc<dyn CacheBackend>>,
    remote_caching: bool,
    local: Arc<InMemoryBackend>,
    health: RemoteHealth,
    session_enabled: bool,
    counters: Counters,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl CacheStore {
    /// A store that only uses process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            remote: None,
            remote_caching: false,
            local: Arc::new(InMemoryBackend::new()),
            health: RemoteHealth::new(ReconnectPolicy::default()),
            session_enabled: false,
            counters: Counters::default(),
            sweeper: Mutex::new(None),
        }
    }

    /// A store that caches in `remote`, falling back to process memory.
    ///
    /// The remote starts out not ready; the first operation probes it.
    #[must_use]
    pub fn with_remote(remote: Arc<dyn CacheBackend>, policy: ReconnectPolicy) -> Self {
        Self {
            remote: Some(remote),
            remote_caching: true,
            local: Arc::new(InMemoryBackend::new()),
            health: RemoteHealth::new(policy),
            session_enabled: false,
            counters: Counters::default(),
            sweeper: Mutex::new(None),
        }
    }

    /// Marks whether sessions may use the shared backend.
    #[must_use]
    pub fn with_session_storage(mut self, enabled: bool) -> Self {
        self.session_enabled = enabled;
        self
    }

    /// Builds the store described by `config` and starts its sweeper.
    ///
    /// Never fails: a bad Redis URL or an unreachable server leaves the
    /// store on the in-process fallback.
    pub async fn init(config: &RedisConfig) -> Arc<Self> {
        let store = if config.is_needed() {
            match RedisBackend::connect(config) {
                Ok(backend) => {
                    let mut store =
                        Self::with_remote(Arc::new(backend), ReconnectPolicy::from_config(config))
                            .with_session_storage(config.session_enabled);
                    store.remote_caching = config.cache_enabled;
                    store.refresh_readiness().await;
                    store
                }
                Err(e) => {
                    warn!("Redis unavailable, using in-process cache: {}", e);
                    Self::in_memory()
                }
            }
        } else {
            info!("Redis disabled, using in-process cache");
            Self::in_memory()
        };

        info!(
            backend = store.backend_name(),
            ready = store.is_ready(),
            sessions = ?store.session_store_kind(),
            "Cache store initialized"
        );

        let store = Arc::new(store);
        store.start_sweeper(SWEEP_INTERVAL);
        store
    }

    /// Starts the background task that purges expired in-memory entries.
    ///
    /// When sessions may live in the remote, each tick also re-checks its
    /// readiness, since no cache traffic reaches a session-only remote.
    /// Replaces any running sweeper. Must be called inside a tokio runtime.
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) {
        let local = Arc::clone(&self.local);
        let store = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let purged = local.purge_expired();
                if purged > 0 {
                    debug!("Purged {} expired cache entries", purged);
                }
                let Some(store) = store.upgrade() else {
                    break;
                };
                if store.session_enabled && store.remote.is_some() {
                    store.refresh_readiness().await;
                }
            }
        });
        if let Some(previous) = self.sweeper.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Returns the cached value for `key`. Any backend failure is a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        let value = match self.available_remote().await {
            Some(remote) => match self.guarded("GET", remote.get(key)).await {
                Some(value) => value,
                None => self.local_get(key).await,
            },
            None => self.local_get(key).await,
        };

        if value.is_some() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for key '{}'", key);
        } else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            debug!("Cache miss for key '{}'", key);
        }
        value
    }

    /// Stores `value` under `key` for `ttl`. Never fails.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let stored_remotely = match self.available_remote().await {
            Some(remote) => self.guarded("SET", remote.set(key, value, ttl)).await.is_some(),
            None => false,
        };
        if !stored_remotely {
            // In-memory writes cannot fail.
            let _ = self.local.set(key, value, ttl).await;
        }
        self.counters.stores.fetch_add(1, Ordering::Relaxed);
        debug!("Cached key '{}' with TTL {:?}", key, ttl);
    }

    /// Deletes every entry whose key starts with `prefix`.
    ///
    /// Always clears the fallback as well, so entries written during an
    /// outage do not outlive the mutation. Returns how many were removed.
    pub async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        let mut deleted = self.local.delete_by_prefix(prefix).await.unwrap_or(0);
        if let Some(remote) = self.available_remote().await {
            deleted += self
                .guarded("DEL", remote.delete_by_prefix(prefix))
                .await
                .unwrap_or(0);
        }
        self.counters.invalidated.fetch_add(deleted, Ordering::Relaxed);
        debug!("Invalidated {} entries with prefix '{}'", deleted, prefix);
        deleted
    }

    /// Drops every entry from every backend.
    pub async fn clear_all(&self) {
        let _ = self.local.clear().await;
        if let Some(remote) = self.available_remote().await {
            self.guarded("CLEAR", remote.clear()).await;
        }
        info!("Cache cleared");
    }

    /// Whether the shared remote backend is configured and healthy.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remote.is_some() && self.health.is_ready()
    }

    #[must_use]
    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_some() && self.remote_caching
    }

    /// Name of the backend currently serving cache reads.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match &self.remote {
            Some(remote) if self.remote_caching && self.health.is_ready() => remote.name(),
            _ => self.local.name(),
        }
    }

    /// Where sessions should be stored right now.
    #[must_use]
    pub fn session_store_kind(&self) -> SessionStoreKind {
        if self.session_enabled && self.is_ready() {
            SessionStoreKind::Shared
        } else {
            SessionStoreKind::Local
        }
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            invalidated: self.counters.invalidated.load(Ordering::Relaxed),
            remote_failures: self.counters.remote_failures.load(Ordering::Relaxed),
        }
    }

    /// Re-checks the remote backend and returns the resulting readiness.
    ///
    /// A ready remote is pinged; one in backoff is probed once its deadline
    /// has passed.
    pub async fn refresh_readiness(&self) -> bool {
        if let Some(remote) = &self.remote {
            match self.health.status() {
                RemoteStatus::Ready => {
                    self.guarded("PING", remote.ping()).await;
                }
                RemoteStatus::Probe => {
                    self.probe(remote).await;
                }
                RemoteStatus::Backoff => {}
            }
        }
        self.is_ready()
    }

    /// Stops the sweeper, releases remote connections and drops local
    /// entries.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
        if let Some(remote) = &self.remote {
            remote.shutdown().await;
        }
        let _ = self.local.clear().await;
        info!("Cache store shut down");
    }

    async fn local_get(&self, key: &str) -> Option<String> {
        self.local.get(key).await.ok().flatten()
    }

    async fn available_remote(&self) -> Option<&Arc<dyn CacheBackend>> {
        let remote = self.remote.as_ref().filter(|_| self.remote_caching)?;
        match self.health.status() {
            RemoteStatus::Ready => Some(remote),
            RemoteStatus::Backoff => None,
            RemoteStatus::Probe => self.probe(remote).await.then_some(remote),
        }
    }

    /// Pings the remote and, when it caches responses, clears its
    /// namespace. The remote becomes ready only after both succeed; until
    /// then concurrent callers stay on the fallback.
    async fn probe(&self, remote: &Arc<dyn CacheBackend>) -> bool {
        let outcome = match self.timed("PING", remote.ping()).await {
            Ok(()) if self.remote_caching => self.timed("CLEAR", remote.clear()).await,
            other => other,
        };

        match outcome {
            Ok(()) => {
                self.health.mark_ready();
                info!("Remote cache backend ready");
                true
            }
            Err(e) => {
                self.record_failure("PROBE", &e);
                false
            }
        }
    }

    /// Runs a remote call under the command timeout and records its outcome.
    async fn guarded<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = JobPortalResult<T>>,
    ) -> Option<T> {
        match self.timed(op, call).await {
            Ok(value) => {
                self.health.record_success();
                Some(value)
            }
            Err(e) => {
                self.record_failure(op, &e);
                None
            }
        }
    }

    async fn timed<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = JobPortalResult<T>>,
    ) -> JobPortalResult<T> {
        let limit = self.health.policy.command_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(JobPortalError::Timeout(format!("{} exceeded {:?}", op, limit))),
        }
    }

    fn record_failure(&self, op: &'static str, e: &JobPortalError) {
        self.counters.remote_failures.fetch_add(1, Ordering::Relaxed);
        let retry_in = self.health.record_failure();
        warn!(op, retry_in = ?retry_in, "Remote cache unavailable, using in-process cache: {}", e);
    }
}

impl Drop for CacheStore {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}
