//! Application state for Axum handlers.

use jobportal_cache::CacheStore;
use jobportal_service::{ApplicationService, CompanyService, InMemoryPortal, JobService, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub job_service: Arc<dyn JobService>,
    pub company_service: Arc<dyn CompanyService>,
    pub application_service: Arc<dyn ApplicationService>,
    pub user_service: Arc<dyn UserService>,
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        job_service: Arc<dyn JobService>,
        company_service: Arc<dyn CompanyService>,
        application_service: Arc<dyn ApplicationService>,
        user_service: Arc<dyn UserService>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            job_service,
            company_service,
            application_service,
            user_service,
            cache,
        }
    }

    /// State whose services are all backed by one in-memory portal.
    pub fn in_memory(portal: Arc<InMemoryPortal>, cache: Arc<CacheStore>) -> Self {
        Self::new(portal.clone(), portal.clone(), portal.clone(), portal, cache)
    }
}
