//! Application DTOs.

use crate::models::ApplicationStatus;
use serde::{Deserialize, Serialize};

/// Request to move an application to a new status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}
