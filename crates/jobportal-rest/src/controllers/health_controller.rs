//! Health check controller.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use jobportal_cache::{CacheStats, SessionStoreKind};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Cache status report.
#[derive(Debug, Serialize)]
pub struct CacheHealthResponse {
    /// Backend currently serving reads.
    pub backend: &'static str,
    pub remote_configured: bool,
    pub remote_ready: bool,
    pub session_store: SessionStoreKind,
    pub stats: CacheStats,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/cache", get(cache_health))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Reports the cache backend and its counters. Probes a remote that is
/// waiting for retry.
pub async fn cache_health(State(state): State<AppState>) -> impl IntoResponse {
    let remote_ready = state.cache.refresh_readiness().await;
    Json(CacheHealthResponse {
        backend: state.cache.backend_name(),
        remote_configured: state.cache.is_remote_configured(),
        remote_ready,
        session_store: state.cache.session_store_kind(),
        stats: state.cache.stats(),
    })
}

/// The API serves from the in-process cache when Redis is down, so a
/// degraded cache does not make the service unready.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
