//! Job controller.

use super::parse_id;
use crate::{
    extractors::CurrentPrincipal,
    responses::{created, ok, ApiResult, CreatedResult},
    router::CachePolicies,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use jobportal_cache::{groups::paths, CacheGroup};
use jobportal_service::{Job, JobSearchQuery, PostJobRequest};
use tracing::debug;

/// Creates the job router.
pub fn router(policies: &CachePolicies) -> Router<AppState> {
    let ttl = policies.ttl.jobs;
    Router::new()
        .route(paths::JOB_POST, policies.invalidates(post(post_job), &[CacheGroup::Jobs]))
        .route(paths::JOB_LIST, policies.cached(get(list_jobs), ttl))
        .route(paths::JOB_BY_ID, policies.cached(get(get_job), ttl))
        .route(paths::JOB_ADMIN_LIST, policies.cached(get(admin_jobs), ttl))
}

/// Post a job (recruiters only).
async fn post_job(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Json(request): Json<PostJobRequest>,
) -> CreatedResult<Job> {
    debug!("Post job request: {}", request.title);

    let job = state.job_service.post_job(&principal, request).await?;
    created(job, "Job posted")
}

/// List jobs, optionally filtered by keyword.
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> ApiResult<Vec<Job>> {
    let jobs = state.job_service.list_jobs(query.keyword.as_deref()).await?;
    ok(jobs)
}

/// Get a job by ID.
async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let id = parse_id(&id, "job")?;
    let job = state.job_service.get_job(id).await?;
    ok(job)
}

/// List the caller's posted jobs.
async fn admin_jobs(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
) -> ApiResult<Vec<Job>> {
    let jobs = state.job_service.admin_jobs(&principal).await?;
    ok(jobs)
}
