//! HTTP middleware.

mod auth;
mod body;
mod invalidation;
mod logging;
mod response_cache;

pub use auth::{auth_middleware, AuthMiddlewareState};
pub use invalidation::{invalidate_groups, InvalidationPolicy};
pub use logging::logging_middleware;
pub use response_cache::{response_cache, ResponseCachePolicy, CACHE_STATUS_HEADER};
