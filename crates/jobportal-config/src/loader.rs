//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use jobportal_core::JobPortalError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration loader.
///
/// Holds the loaded configuration behind a lock so it can be reloaded, but
/// route TTLs and invalidation groups are read once when the router is
/// built and do not change afterwards.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `JOBPORTAL__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, JobPortalError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, JobPortalError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), JobPortalError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, JobPortalError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("JOBPORTAL_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("JOBPORTAL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_jobportal_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Validates a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), JobPortalError> {
    if config.app.environment == "production"
        && config.security.jwt_secret == "change-me-in-production"
    {
        warn!("Using default JWT secret in production! This is a security risk.");
    }

    config.cache.default_ttl()?;
    config.cache.ttl.validate()?;

    if config.redis.is_needed() {
        if config.redis.url.trim().is_empty() {
            return Err(JobPortalError::Configuration(
                "Redis URL is required when Redis caching or sessions are enabled".to_string(),
            ));
        }
        let parsed = url::Url::parse(&config.redis.url).map_err(|e| {
            JobPortalError::Configuration(format!("Invalid Redis URL '{}': {}", config.redis.url, e))
        })?;
        if !matches!(parsed.scheme(), "redis" | "rediss" | "redis+unix") {
            return Err(JobPortalError::Configuration(format!(
                "Unsupported Redis URL scheme '{}'",
                parsed.scheme()
            )));
        }
    }

    Ok(())
}

fn config_error_to_jobportal_error(err: ConfigError) -> JobPortalError {
    JobPortalError::Configuration(err.to_string())
}
