//! Notification controller.

use super::parse_id;
use crate::{
    extractors::CurrentPrincipal,
    responses::{ok, ApiResult},
    router::CachePolicies,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use jobportal_cache::{groups::paths, CacheGroup};
use jobportal_service::Notification;

/// Creates the notification router.
pub fn router(policies: &CachePolicies) -> Router<AppState> {
    Router::new()
        .route(
            paths::NOTIFICATION_LIST,
            policies.cached(get(notifications), policies.ttl.notifications),
        )
        .route(
            paths::NOTIFICATION_READ,
            policies.invalidates(post(mark_read), &[CacheGroup::Notifications]),
        )
}

async fn notifications(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
) -> ApiResult<Vec<Notification>> {
    let notifications = state.user_service.notifications(&principal).await?;
    ok(notifications)
}

async fn mark_read(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    let id = parse_id(&id, "notification")?;
    let notification = state.user_service.mark_notification_read(&principal, id).await?;
    ok(notification)
}
