//! Response cache middleware for read endpoints.

use super::body::{buffer_response, has_cache_directive};
use crate::responses::is_success_envelope;
use axum::{
    body::Body,
    extract::{MatchedPath, RawPathParams, State},
    http::{
        header::{HeaderName, CONTENT_TYPE},
        HeaderValue, Method, Request, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use jobportal_cache::{
    keys::{entry_key, principal_key},
    CacheStore,
};
use jobportal_core::Principal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Header set to `HIT` on responses served from the cache, when enabled.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Caching policy of one read route.
#[derive(Clone)]
pub struct ResponseCachePolicy {
    pub store: Arc<CacheStore>,
    pub ttl: Duration,
    pub max_body_bytes: usize,
    /// Add [`CACHE_STATUS_HEADER`] to hits.
    pub mark_hits: bool,
}

impl ResponseCachePolicy {
    pub fn new(store: Arc<CacheStore>, ttl: Duration, max_body_bytes: usize) -> Self {
        Self {
            store,
            ttl,
            max_body_bytes,
            mark_hits: false,
        }
    }

    #[must_use]
    pub fn with_hit_marker(mut self, enabled: bool) -> Self {
        self.mark_hits = enabled;
        self
    }
}

/// What is kept per entry: the body and the content type it was sent with.
#[derive(Serialize, Deserialize)]
struct CachedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    body: String,
}

/// Serves `GET` requests from the cache, or runs the handler and caches a
/// successful result.
///
/// The key covers the caller, the matched route, its path parameters and
/// the query string. Only `200` responses whose JSON body has
/// `"success": true` and whose `Cache-Control` allows it are stored. A
/// request sent with `Cache-Control: no-cache` skips the lookup but still
/// refreshes the entry.
pub async fn response_cache(
    State(policy): State<ResponseCachePolicy>,
    matched_path: Option<MatchedPath>,
    path_params: Option<RawPathParams>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = {
        let route = matched_path
            .as_ref()
            .map_or_else(|| request.uri().path(), MatchedPath::as_str);
        let params: Vec<String> = path_params
            .map(|params| params.iter().map(|(_, value)| value.to_string()).collect())
            .unwrap_or_default();
        let guest = Principal::guest();
        let principal = request.extensions().get::<Principal>().unwrap_or(&guest);
        let query = request.uri().query().unwrap_or_default();
        entry_key(route, &principal_key(principal, &params, query))
    };

    if has_cache_directive(request.headers(), &["no-cache", "no-store"]) {
        debug!("Cache lookup bypassed for '{}'", key);
    } else if let Some(stored) = policy.store.get(&key).await {
        match serde_json::from_str::<CachedResponse>(&stored) {
            Ok(cached) => return cached_response(cached, policy.mark_hits),
            Err(e) => debug!("Ignoring unreadable cache entry '{}': {}", key, e),
        }
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK
        || has_cache_directive(response.headers(), &["no-store", "no-cache", "private"])
    {
        return response;
    }

    let (parts, bytes) = match buffer_response(response, policy.max_body_bytes).await {
        Ok(buffered) => buffered,
        Err(response) => {
            debug!("Response for '{}' not cached: body too large", key);
            return response;
        }
    };

    if is_success_envelope(&bytes) {
        let entry = std::str::from_utf8(&bytes).map(|body| CachedResponse {
            content_type: parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            body: body.to_owned(),
        });
        match entry {
            Ok(entry) => match serde_json::to_string(&entry) {
                Ok(stored) => policy.store.set(&key, &stored, policy.ttl).await,
                Err(e) => debug!("Response for '{}' not cached: {}", key, e),
            },
            Err(e) => debug!("Response for '{}' not cached: {}", key, e),
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Rebuilds a `200` response carrying the handler's content type.
fn cached_response(cached: CachedResponse, mark_hit: bool) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    let headers = response.headers_mut();
    if let Some(value) = cached
        .content_type
        .and_then(|content_type| HeaderValue::from_str(&content_type).ok())
    {
        headers.insert(CONTENT_TYPE, value);
    }
    if mark_hit {
        headers.insert(
            HeaderName::from_static(CACHE_STATUS_HEADER),
            HeaderValue::from_static("HIT"),
        );
    }
    response
}
