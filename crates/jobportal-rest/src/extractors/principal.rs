//! Caller identity extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jobportal_core::Principal;
use std::convert::Infallible;

/// The caller attached by the auth middleware, or the guest principal.
///
/// Never rejects; role checks happen in the services.
pub struct CurrentPrincipal(pub Principal);

impl std::ops::Deref for CurrentPrincipal {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts.extensions.get::<Principal>().cloned().unwrap_or_default(),
        ))
    }
}
