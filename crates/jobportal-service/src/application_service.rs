//! Application service trait definition.

use crate::dto::UpdateStatusRequest;
use crate::models::{Application, AppliedJob};
use async_trait::async_trait;
use jobportal_core::{JobPortalResult, Principal};
use uuid::Uuid;

/// Application service trait.
#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Applies the caller to a job. Applying twice is a conflict.
    async fn apply(&self, principal: &Principal, job_id: Uuid) -> JobPortalResult<Application>;

    /// Lists the caller's applications with their jobs, newest first.
    async fn applied_jobs(&self, principal: &Principal) -> JobPortalResult<Vec<AppliedJob>>;

    /// Lists the applications to a job the caller posted.
    async fn applicants(&self, principal: &Principal, job_id: Uuid) -> JobPortalResult<Vec<Application>>;

    /// Changes an application's status and notifies the applicant.
    async fn update_status(
        &self,
        principal: &Principal,
        application_id: Uuid,
        request: UpdateStatusRequest,
    ) -> JobPortalResult<Application>;
}
