//! User DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to update the caller's profile. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 32))]
    pub phone_number: Option<String>,

    #[validate(length(max = 1000, message = "Bio cannot exceed 1000 characters"))]
    pub bio: Option<String>,

    pub skills: Option<Vec<String>>,
}
