//! Job service trait definition.

use crate::dto::PostJobRequest;
use crate::models::Job;
use async_trait::async_trait;
use jobportal_core::{JobPortalResult, Principal};
use uuid::Uuid;

/// Job service trait.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Posts a job for a company the caller owns. Recruiters only.
    async fn post_job(&self, principal: &Principal, request: PostJobRequest) -> JobPortalResult<Job>;

    /// Lists jobs, newest first, optionally filtered by keyword.
    async fn list_jobs(&self, keyword: Option<&str>) -> JobPortalResult<Vec<Job>>;

    /// Gets a job by ID.
    async fn get_job(&self, id: Uuid) -> JobPortalResult<Job>;

    /// Lists the jobs posted by the caller. Recruiters only.
    async fn admin_jobs(&self, principal: &Principal) -> JobPortalResult<Vec<Job>>;
}
