//! Main application router.

use crate::{
    controllers::{
        application_controller, company_controller, health_controller, job_controller,
        notification_controller, user_controller,
    },
    middleware::{
        auth_middleware, invalidate_groups, logging_middleware, response_cache,
        AuthMiddlewareState, InvalidationPolicy, ResponseCachePolicy,
    },
    security::TokenVerifier,
    state::AppState,
};
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use jobportal_cache::{CacheGroup, CacheStore};
use jobportal_config::{AppConfig, CacheConfig, ServerConfig};
use jobportal_core::JobPortalResult;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Parsed TTL of each family of cached routes.
#[derive(Debug, Clone, Copy)]
pub struct RouteTtls {
    pub jobs: Duration,
    pub companies: Duration,
    pub applications: Duration,
    pub profile: Duration,
    pub saved_jobs: Duration,
    pub notifications: Duration,
}

impl RouteTtls {
    pub fn from_config(config: &CacheConfig) -> JobPortalResult<Self> {
        let ttl = &config.ttl;
        Ok(Self {
            jobs: config.route_ttl(&ttl.jobs)?,
            companies: config.route_ttl(&ttl.companies)?,
            applications: config.route_ttl(&ttl.applications)?,
            profile: config.route_ttl(&ttl.profile)?,
            saved_jobs: config.route_ttl(&ttl.saved_jobs)?,
            notifications: config.route_ttl(&ttl.notifications)?,
        })
    }
}

/// Attaches the response cache and invalidation middleware to routes.
///
/// When caching is disabled both are no-ops and routes are returned as is.
#[derive(Clone)]
pub struct CachePolicies {
    store: Arc<CacheStore>,
    enabled: bool,
    max_body_bytes: usize,
    hit_header: bool,
    pub ttl: RouteTtls,
}

impl CachePolicies {
    pub fn from_config(store: Arc<CacheStore>, config: &CacheConfig) -> JobPortalResult<Self> {
        Ok(Self {
            store,
            enabled: config.enabled,
            max_body_bytes: config.max_body_bytes,
            hit_header: config.hit_header,
            ttl: RouteTtls::from_config(config)?,
        })
    }

    /// Serves `route` through the response cache with `ttl`.
    pub fn cached(&self, route: MethodRouter<AppState>, ttl: Duration) -> MethodRouter<AppState> {
        if !self.enabled {
            return route;
        }
        let policy = ResponseCachePolicy::new(Arc::clone(&self.store), ttl, self.max_body_bytes)
            .with_hit_marker(self.hit_header);
        route.layer(middleware::from_fn_with_state(policy, response_cache))
    }

    /// Invalidates `groups` after `route` succeeds.
    pub fn invalidates(
        &self,
        route: MethodRouter<AppState>,
        groups: &[CacheGroup],
    ) -> MethodRouter<AppState> {
        if !self.enabled {
            return route;
        }
        let policy = InvalidationPolicy::new(Arc::clone(&self.store), groups, self.max_body_bytes);
        route.layer(middleware::from_fn_with_state(policy, invalidate_groups))
    }
}

/// Creates the main application router.
pub fn create_router(
    state: AppState,
    config: &AppConfig,
    verifier: Arc<TokenVerifier>,
) -> JobPortalResult<Router> {
    let policies = CachePolicies::from_config(Arc::clone(&state.cache), &config.cache)?;
    let auth_state = AuthMiddlewareState::new(verifier, &config.security.token_cookie);
    let cors = create_cors_layer(&config.server);

    // Cache middleware sits inside auth so it always sees the caller.
    let api_router = Router::new()
        .merge(job_controller::router(&policies))
        .merge(company_controller::router(&policies))
        .merge(application_controller::router(&policies))
        .merge(user_controller::router(&policies))
        .merge(notification_controller::router(&policies))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let router = Router::new()
        .merge(health_controller::router())
        .merge(api_router)
        .route("/", get(root))
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(logging_middleware));

    info!(
        cache_enabled = config.cache.enabled,
        "Router created with job portal endpoints"
    );
    Ok(router)
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "JobPortal API v1"
}
