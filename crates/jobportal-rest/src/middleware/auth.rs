//! Authentication middleware.

use crate::security::TokenVerifier;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use jobportal_core::Principal;
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub verifier: Arc<TokenVerifier>,
    pub token_cookie: Arc<str>,
}

impl AuthMiddlewareState {
    pub fn new(verifier: Arc<TokenVerifier>, token_cookie: &str) -> Self {
        Self {
            verifier,
            token_cookie: Arc::from(token_cookie),
        }
    }
}

/// Attaches a [`Principal`] to every request.
///
/// The token comes from `Authorization: Bearer` or, failing that, the
/// token cookie. Missing or invalid tokens leave the caller as guest; the
/// services decide whether that is allowed.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| jar.get(&state.token_cookie).map(|c| c.value().to_string()));

    let principal = match token {
        Some(token) => match state.verifier.verify(&token) {
            Ok(principal) => {
                debug!("Authenticated {} as {}", principal.id, principal.role);
                principal
            }
            Err(e) => {
                debug!("Token validation failed: {}", e);
                Principal::guest()
            }
        },
        None => Principal::guest(),
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}
