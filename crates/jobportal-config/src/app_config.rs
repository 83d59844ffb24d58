//! Application configuration structures.

use crate::parse_ttl;
use jobportal_core::JobPortalResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Response cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// JWT/Security configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "jobportal".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// REST server host.
    pub host: String,
    /// REST server port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the REST server address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis configuration.
///
/// Caching and session storage are switched on independently; either one
/// alone is enough for the server to create a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Use Redis as the response cache backend.
    pub cache_enabled: bool,
    /// Use Redis for session storage.
    pub session_enabled: bool,
    /// Connection pool size.
    pub pool_size: usize,
    /// Timeout for establishing a connection, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Timeout for a single command, in milliseconds.
    pub command_timeout_ms: u64,
    /// First reconnect delay after a failure, in milliseconds.
    pub reconnect_initial_delay_ms: u64,
    /// Upper bound for the doubling reconnect delay, in milliseconds.
    pub reconnect_max_delay_ms: u64,
    /// Namespace prepended to every cache key stored in Redis.
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            cache_enabled: false,
            session_enabled: false,
            pool_size: 10,
            connect_timeout_ms: 2_000,
            command_timeout_ms: 500,
            reconnect_initial_delay_ms: 500,
            reconnect_max_delay_ms: 30_000,
            key_prefix: "jobportal:cache:".to_string(),
        }
    }
}

impl RedisConfig {
    /// Whether any feature needs a Redis connection.
    #[must_use]
    pub const fn is_needed(&self) -> bool {
        self.cache_enabled || self.session_enabled
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    #[must_use]
    pub const fn reconnect_initial_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_delay_ms)
    }

    #[must_use]
    pub const fn reconnect_max_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_delay_ms)
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch for the response cache middleware.
    pub enabled: bool,
    /// TTL applied to route families whose entry in `ttl` is empty.
    pub default_ttl: String,
    /// Responses with larger bodies are passed through uncached.
    pub max_body_bytes: usize,
    /// Add `x-cache: HIT` to responses served from the cache.
    pub hit_header: bool,
    /// Per-resource TTLs.
    pub ttl: RouteTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl: "5 minutes".to_string(),
            max_body_bytes: 1024 * 1024,
            hit_header: false,
            ttl: RouteTtlConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Returns the parsed default TTL.
    pub fn default_ttl(&self) -> JobPortalResult<Duration> {
        parse_ttl(&self.default_ttl)
    }

    /// Parses one `ttl` entry, falling back to `default_ttl` when it is empty.
    pub fn route_ttl(&self, entry: &str) -> JobPortalResult<Duration> {
        if entry.trim().is_empty() {
            self.default_ttl()
        } else {
            parse_ttl(entry)
        }
    }
}

/// TTLs for each family of read routes, as human-readable strings.
///
/// Applications and notifications change often and get short TTLs to keep
/// the stale window after a racing read small.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTtlConfig {
    pub jobs: String,
    pub companies: String,
    pub applications: String,
    pub profile: String,
    pub saved_jobs: String,
    pub notifications: String,
}

impl Default for RouteTtlConfig {
    fn default() -> Self {
        Self {
            jobs: "5 minutes".to_string(),
            companies: "10 minutes".to_string(),
            applications: "30 seconds".to_string(),
            profile: "2 minutes".to_string(),
            saved_jobs: "1 minute".to_string(),
            notifications: "30 seconds".to_string(),
        }
    }
}

impl RouteTtlConfig {
    /// Parses every non-empty entry, failing on the first invalid one.
    pub fn validate(&self) -> JobPortalResult<()> {
        for ttl in [
            &self.jobs,
            &self.companies,
            &self.applications,
            &self.profile,
            &self.saved_jobs,
            &self.notifications,
        ] {
            if !ttl.trim().is_empty() {
                parse_ttl(ttl)?;
            }
        }
        Ok(())
    }
}

/// Security configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// JWT secret key.
    pub jwt_secret: String,
    /// JWT issuer.
    pub jwt_issuer: String,
    /// Name of the cookie that may carry the token.
    pub token_cookie: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "jobportal".to_string(),
            token_cookie: "token".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
