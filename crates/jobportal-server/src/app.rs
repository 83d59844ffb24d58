//! Application assembly and lifecycle.

use axum::Router;
use jobportal_cache::CacheStore;
use jobportal_config::AppConfig;
use jobportal_core::{JobPortalError, JobPortalResult};
use jobportal_rest::{create_router, AppState, TokenVerifier};
use jobportal_service::InMemoryPortal;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// A fully wired application: cache store, services and router.
///
/// The cache store is created here and handed to everything that needs it;
/// [`App::serve`] shuts it down once the server has stopped.
pub struct App {
    config: AppConfig,
    store: Arc<CacheStore>,
    router: Router,
}

impl App {
    /// Builds the application. Never fails because of Redis: an unreachable
    /// server leaves the cache on the in-process fallback.
    pub async fn build(config: AppConfig) -> JobPortalResult<Self> {
        let store = CacheStore::init(&config.redis).await;
        let portal = Arc::new(InMemoryPortal::new());
        let state = AppState::in_memory(portal, Arc::clone(&store));
        let verifier = Arc::new(TokenVerifier::new(&config.security));
        let router = create_router(state, &config, verifier)?;

        Ok(Self {
            config,
            store,
            router,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Returns a handle to the router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves on `listener` until `shutdown` completes, then releases the
    /// cache store.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> JobPortalResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| JobPortalError::Internal(format!("REST server error: {}", e)));

        self.store.shutdown().await;
        info!("Server shutdown complete");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_build_with_defaults_uses_memory_cache() {
        let app = App::build(AppConfig::default()).await.unwrap();
        assert_eq!(app.store().backend_name(), "memory");
        assert!(!app.store().is_remote_configured());
        assert_eq!(app.config().server.port, 8000);
    }

    #[tokio::test]
    async fn test_build_with_unreachable_redis_still_serves() {
        let mut config = AppConfig::default();
        config.redis.cache_enabled = true;
        config.redis.url = "redis://127.0.0.1:1".to_string();
        config.redis.connect_timeout_ms = 200;
        config.redis.command_timeout_ms = 200;

        let app = App::build(config).await.unwrap();
        assert!(app.store().is_remote_configured());
        assert!(!app.store().is_ready());

        let response = app
            .router()
            .oneshot(Request::get("/api/v1/job/get").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_ttl_fails_build() {
        let mut config = AppConfig::default();
        config.cache.ttl.jobs = "whenever".to_string();
        assert!(App::build(config).await.is_err());
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let app = App::build(AppConfig::default()).await.unwrap();
        let store = Arc::clone(app.store());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(app.serve(listener, async move {
            let _ = rx.await;
        }));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        tokio::io::AsyncWriteExt::write_all(
            &mut stream,
            b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await
        .unwrap();
        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut buf).await.unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.1 200"));

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert_eq!(store.stats().stores, 0);
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let app = App::build(AppConfig::default()).await.unwrap();
        let response = app
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"JobPortal API v1");
    }
}
