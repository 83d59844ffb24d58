//! Application controller.

use super::parse_id;
use crate::{
    extractors::CurrentPrincipal,
    responses::{created, ok, ApiResult, CreatedResult},
    router::CachePolicies,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use jobportal_cache::{groups::paths, CacheGroup};
use jobportal_service::{Application, AppliedJob, UpdateStatusRequest};
use tracing::debug;

/// Creates the application router.
pub fn router(policies: &CachePolicies) -> Router<AppState> {
    let ttl = policies.ttl.applications;
    Router::new()
        .route(
            paths::APPLICATION_APPLY,
            policies.invalidates(post(apply), &[CacheGroup::Applications]),
        )
        .route(paths::APPLICATION_LIST, policies.cached(get(applied_jobs), ttl))
        .route(paths::APPLICATION_APPLICANTS, policies.cached(get(applicants), ttl))
        .route(
            paths::APPLICATION_STATUS,
            policies.invalidates(
                post(update_status),
                &[CacheGroup::Applications, CacheGroup::Notifications],
            ),
        )
}

/// Apply to a job (students only).
async fn apply(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(job_id): Path<String>,
) -> CreatedResult<Application> {
    let job_id = parse_id(&job_id, "job")?;
    debug!("Apply request for job {}", job_id);

    let application = state.application_service.apply(&principal, job_id).await?;
    created(application, "Application submitted")
}

async fn applied_jobs(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
) -> ApiResult<Vec<AppliedJob>> {
    let applied = state.application_service.applied_jobs(&principal).await?;
    ok(applied)
}

async fn applicants(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(job_id): Path<String>,
) -> ApiResult<Vec<Application>> {
    let job_id = parse_id(&job_id, "job")?;
    let applications = state
        .application_service
        .applicants(&principal, job_id)
        .await?;
    ok(applications)
}

/// Move an application to a new status (job owner only).
async fn update_status(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Application> {
    let id = parse_id(&id, "application")?;
    debug!("Status update for application {}: {:?}", id, request.status);

    let application = state
        .application_service
        .update_status(&principal, id, request)
        .await?;
    ok(application)
}
