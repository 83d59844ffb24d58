//! User service trait definition.

use crate::dto::UpdateProfileRequest;
use crate::models::{Job, Notification, SavedJobToggle, UserProfile};
use async_trait::async_trait;
use jobportal_core::{JobPortalResult, Principal};
use uuid::Uuid;

/// User service trait: profile, saved jobs and notifications of the caller.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Gets the caller's profile, blank if never saved.
    async fn profile(&self, principal: &Principal) -> JobPortalResult<UserProfile>;

    /// Updates the caller's profile.
    async fn update_profile(
        &self,
        principal: &Principal,
        request: UpdateProfileRequest,
    ) -> JobPortalResult<UserProfile>;

    /// Lists the caller's saved jobs. Jobs deleted since are skipped.
    async fn saved_jobs(&self, principal: &Principal) -> JobPortalResult<Vec<Job>>;

    /// Saves the job, or unsaves it if already saved.
    async fn toggle_saved_job(&self, principal: &Principal, job_id: Uuid) -> JobPortalResult<SavedJobToggle>;

    /// Lists the caller's notifications, newest first.
    async fn notifications(&self, principal: &Principal) -> JobPortalResult<Vec<Notification>>;

    /// Marks one of the caller's notifications as read.
    async fn mark_notification_read(&self, principal: &Principal, id: Uuid) -> JobPortalResult<Notification>;
}
