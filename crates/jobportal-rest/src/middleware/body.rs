//! Response inspection helpers shared by the cache middleware.

use axum::{
    body::{to_bytes, Body, Bytes, HttpBody},
    http::{header::CACHE_CONTROL, response::Parts, HeaderMap},
    response::Response,
};
use tracing::warn;

/// Buffers the body of `response` if its size is known to fit in `limit`.
///
/// Returns the response untouched when it may be larger, so streaming and
/// oversized bodies pass through without being inspected.
pub(crate) async fn buffer_response(
    response: Response,
    limit: usize,
) -> Result<(Parts, Bytes), Response> {
    let (parts, body) = response.into_parts();
    let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
    let fits = body.size_hint().upper().is_some_and(|upper| upper <= limit_u64);
    if !fits {
        return Err(Response::from_parts(parts, body));
    }

    match to_bytes(body, limit).await {
        Ok(bytes) => Ok((parts, bytes)),
        Err(e) => {
            warn!("Failed to buffer response body: {}", e);
            Err(Response::from_parts(parts, Body::empty()))
        }
    }
}

/// Whether any `Cache-Control` header carries one of `directives`.
pub(crate) fn has_cache_directive(headers: &HeaderMap, directives: &[&str]) -> bool {
    headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|directive| directive.split('=').next())
        .map(|name| name.trim().to_ascii_lowercase())
        .any(|name| directives.contains(&name.as_str()))
}
