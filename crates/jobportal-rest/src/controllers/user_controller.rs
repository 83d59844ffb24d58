//! User profile and saved jobs controller.

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
    Json, Router,
};
use jobportal_cache::{groups::paths, CacheGroup};
use jobportal_service::{Job, SavedJobToggle, UpdateProfileRequest, UserProfile};

/// Creates the user router.
pub fn router(policies: &CachePolicies) -> Router<AppState> {
    Router::new()
        .route(paths::USER_PROFILE, policies.cached(get(profile), policies.ttl.profile))
        .route(
            paths::USER_PROFILE_UPDATE,
            policies.invalidates(post(update_profile), &[CacheGroup::User]),
        )
        .route(paths::SAVED_JOBS, policies.cached(get(saved_jobs), policies.ttl.saved_jobs))
        .route(
            paths::SAVED_JOBS_TOGGLE,
            policies.invalidates(post(toggle_saved_job), &[CacheGroup::SavedJobs]),
        )
}

async fn profile(State(state): State<AppState>, principal: CurrentPrincipal) -> ApiResult<UserProfile> {
    let profile = state.user_service.profile(&principal).await?;
    ok(profile)
}

async fn update_profile(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<UserProfile> {
    let profile = state.user_service.update_profile(&principal, request).await?;
    ok(profile)
}

async fn saved_jobs(State(state): State<AppState>, principal: CurrentPrincipal) -> ApiResult<Vec<Job>> {
    let jobs = state.user_service.saved_jobs(&principal).await?;
    ok(jobs)
}

/// Save a job, or unsave it if already saved.
async fn toggle_saved_job(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(job_id): Path<String>,
) -> ApiResult<SavedJobToggle> {
    let job_id = parse_id(&job_id, "job")?;
    let toggle = state.user_service.toggle_saved_job(&principal, job_id).await?;
    ok(toggle)
}
