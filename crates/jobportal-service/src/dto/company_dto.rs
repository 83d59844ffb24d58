//! Company DTOs.

use jobportal_core::validation::rules;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a company.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterCompanyRequest {
    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 100, message = "Company name cannot exceed 100 characters")
    )]
    pub name: String,
}

/// Request to update company details. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,
}
