//! Job DTOs.

use jobportal_core::validation::rules;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to post a job.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostJobRequest {
    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 120, message = "Title cannot exceed 120 characters")
    )]
    pub title: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub description: String,

    #[serde(default)]
    pub requirements: Vec<String>,

    pub salary: Option<u64>,

    #[validate(custom(function = "rules::not_blank"))]
    pub location: String,

    #[validate(custom(function = "rules::not_blank"))]
    pub job_type: String,

    #[validate(range(min = 1, max = 1000, message = "Positions must be between 1 and 1000"))]
    pub positions: u32,

    pub company_id: Uuid,
}

/// Query parameters of the job listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSearchQuery {
    pub keyword: Option<String>,
}
