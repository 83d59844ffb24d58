//! Invalidation middleware for write endpoints.

use super::body::buffer_response;
use crate::responses::is_success_envelope;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use jobportal_cache::{CacheGroup, CacheStore};
use jobportal_core::Principal;
use std::sync::Arc;
use tracing::{debug, info};

/// Cache groups a write route invalidates.
#[derive(Clone)]
pub struct InvalidationPolicy {
    pub store: Arc<CacheStore>,
    pub groups: Arc<[CacheGroup]>,
    pub max_body_bytes: usize,
}

impl InvalidationPolicy {
    pub fn new(store: Arc<CacheStore>, groups: &[CacheGroup], max_body_bytes: usize) -> Self {
        Self {
            store,
            groups: Arc::from(groups),
            max_body_bytes,
        }
    }

    /// Deletes every entry of the policy's groups as seen by `principal`.
    pub async fn invalidate(&self, principal: &Principal) -> u64 {
        let mut deleted = 0;
        for group in self.groups.iter() {
            for prefix in group.prefixes(principal) {
                deleted += self.store.delete_by_prefix(&prefix).await;
            }
        }
        deleted
    }
}

/// Invalidates the route's cache groups after a successful write.
///
/// A write succeeded when the status is 2xx and the JSON body has
/// `"success": true`. A 2xx body too large to inspect counts as success.
/// Invalidation finishes before the response is returned, so the caller's
/// next read cannot see the old entries. The response is never altered.
pub async fn invalidate_groups(
    State(policy): State<InvalidationPolicy>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let principal = request
        .extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or_default();

    let response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    let response = match buffer_response(response, policy.max_body_bytes).await {
        Ok((parts, bytes)) => {
            let succeeded = is_success_envelope(&bytes);
            let response = Response::from_parts(parts, Body::from(bytes));
            if !succeeded {
                debug!("Write did not succeed, cache left intact");
                return response;
            }
            response
        }
        Err(response) => response,
    };

    let deleted = policy.invalidate(&principal).await;
    info!(
        groups = ?policy.groups,
        deleted,
        "Invalidated cache groups"
    );
    response
}
