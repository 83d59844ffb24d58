//! Company controller.

use super::parse_id;
use crate::{
    extractors::CurrentPrincipal,
    responses::{created, ok, ApiResult, CreatedResult},
    router::CachePolicies,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use jobportal_cache::{groups::paths, CacheGroup};
use jobportal_service::{Company, RegisterCompanyRequest, UpdateCompanyRequest};
use tracing::debug;

/// Creates the company router.
pub fn router(policies: &CachePolicies) -> Router<AppState> {
    let ttl = policies.ttl.companies;
    Router::new()
        .route(
            paths::COMPANY_REGISTER,
            policies.invalidates(post(register_company), &[CacheGroup::Companies]),
        )
        .route(paths::COMPANY_LIST, policies.cached(get(list_companies), ttl))
        .route(paths::COMPANY_BY_ID, policies.cached(get(get_company), ttl))
        .route(
            paths::COMPANY_UPDATE,
            policies.invalidates(put(update_company), &[CacheGroup::Companies]),
        )
}

async fn register_company(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Json(request): Json<RegisterCompanyRequest>,
) -> CreatedResult<Company> {
    debug!("Register company request: {}", request.name);

    let company = state.company_service.register_company(&principal, request).await?;
    created(company, "Company registered")
}

async fn list_companies(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
) -> ApiResult<Vec<Company>> {
    let companies = state.company_service.list_companies(&principal).await?;
    ok(companies)
}

async fn get_company(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Company> {
    let id = parse_id(&id, "company")?;
    let company = state.company_service.get_company(id).await?;
    ok(company)
}

async fn update_company(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(id): Path<String>,
    Json(request): Json<UpdateCompanyRequest>,
) -> ApiResult<Company> {
    let id = parse_id(&id, "company")?;
    let company = state
        .company_service
        .update_company(&principal, id, request)
        .await?;
    ok(company)
}
