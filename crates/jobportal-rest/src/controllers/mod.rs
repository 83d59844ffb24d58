//! REST controllers.

pub mod application_controller;
pub mod company_controller;
pub mod health_controller;
pub mod job_controller;
pub mod notification_controller;
pub mod user_controller;

use crate::responses::AppError;
use jobportal_core::JobPortalError;
use uuid::Uuid;

/// Parses a path segment as an id of `resource`.
pub(crate) fn parse_id(id: &str, resource: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id)
        .map_err(|_| AppError(JobPortalError::validation(format!("Invalid {} ID: {}", resource, id))))
}
