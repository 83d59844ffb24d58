//! Domain records held by the portal.

use chrono::{DateTime, Utc};
use jobportal_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: Option<u64>,
    pub location: String,
    pub job_type: String,
    pub positions: u32,
    pub company_id: Uuid,
    /// Principal id of the recruiter who posted the job.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Case-insensitive match on title, description or location.
    #[must_use]
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
            || self.location.to_lowercase().contains(&keyword)
    }
}

/// A company registered by a recruiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// A student's application to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application together with the job it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedJob {
    pub application: Application,
    pub job: Job,
}

/// A message for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile data of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// An empty profile for a user who never saved one.
    #[must_use]
    pub fn blank(id: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            role,
            full_name: None,
            email: None,
            phone_number: None,
            bio: None,
            skills: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Result of toggling a saved job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJobToggle {
    pub job_id: Uuid,
    /// Whether the job is saved after the toggle.
    pub saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_keyword_match_is_case_insensitive() {
        let job = Job {
            id: Uuid::now_v7(),
            title: "Rust Engineer".to_string(),
            description: "Build services".to_string(),
            requirements: vec![],
            salary: None,
            location: "Berlin".to_string(),
            job_type: "full-time".to_string(),
            positions: 1,
            company_id: Uuid::now_v7(),
            created_by: "U1".to_string(),
            created_at: Utc::now(),
        };
        assert!(job.matches("rust"));
        assert!(job.matches("BERLIN"));
        assert!(!job.matches("python"));
    }

    #[test]
    fn test_application_status_names() {
        assert_eq!(ApplicationStatus::Accepted.as_str(), "accepted");
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
    }
}
