//! Common test infrastructure for HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jobportal_cache::{CacheBackend, CacheStore, ReconnectPolicy};
use jobportal_config::AppConfig;
use jobportal_core::{JobPortalError, JobPortalResult, Principal};
use jobportal_rest::{create_router, AppState, TokenVerifier};
use jobportal_service::InMemoryPortal;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// A remote backend that refuses every call, like an unreachable Redis.
pub struct UnreachableBackend;

#[async_trait]
impl CacheBackend for UnreachableBackend {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn get(&self, _key: &str) -> JobPortalResult<Option<String>> {
        Err(JobPortalError::cache("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> JobPortalResult<()> {
        Err(JobPortalError::cache("connection refused"))
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> JobPortalResult<u64> {
        Err(JobPortalError::cache("connection refused"))
    }

    async fn clear(&self) -> JobPortalResult<()> {
        Err(JobPortalError::cache("connection refused"))
    }

    async fn ping(&self) -> JobPortalResult<()> {
        Err(JobPortalError::cache("connection refused"))
    }
}

/// A store whose remote backend is down.
pub fn degraded_store() -> Arc<CacheStore> {
    let policy = ReconnectPolicy {
        command_timeout: Duration::from_millis(100),
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    };
    Arc::new(CacheStore::with_remote(Arc::new(UnreachableBackend), policy))
}

/// The full application over an in-memory portal.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<CacheStore>,
    verifier: TokenVerifier,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(CacheStore::in_memory()))
    }

    pub fn with_store(store: Arc<CacheStore>) -> Self {
        let mut config = AppConfig::default();
        config.cache.hit_header = true;
        let verifier = TokenVerifier::new(&config.security);
        let state = AppState::in_memory(Arc::new(InMemoryPortal::new()), Arc::clone(&store));
        let router = create_router(state, &config, Arc::new(verifier.clone()))
            .expect("Failed to build router");
        Self {
            router,
            store,
            verifier,
        }
    }

    pub fn token(&self, principal: &Principal) -> String {
        self.verifier
            .issue(principal, Duration::from_secs(3600))
            .expect("Failed to issue token")
    }

    pub async fn get(&self, uri: &str, principal: Option<&Principal>) -> TestResponse {
        self.send(Method::GET, uri, principal, None).await
    }

    pub async fn post(&self, uri: &str, principal: Option<&Principal>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, principal, Some(body)).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        principal: Option<&Principal>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(principal) = principal {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(principal)),
            );
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send(&self.router, request).await
    }
}

/// Status, headers and parsed JSON body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn is_cache_hit(&self) -> bool {
        self.headers
            .get("x-cache")
            .is_some_and(|value| value == "HIT")
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}
