//! Process-local portal backing every service trait.

use crate::application_service::ApplicationService;
use crate::company_service::CompanyService;
use crate::dto::{
    PostJobRequest, RegisterCompanyRequest, UpdateCompanyRequest, UpdateProfileRequest,
    UpdateStatusRequest,
};
use crate::job_service::JobService;
use crate::models::{
    Application, ApplicationStatus, AppliedJob, Company, Job, Notification, SavedJobToggle,
    UserProfile,
};
use crate::user_service::UserService;
use async_trait::async_trait;
use chrono::Utc;
use jobportal_core::{JobPortalError, JobPortalResult, Principal, Role, ValidateExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Default)]
struct PortalData {
    // Vectors keep insertion order, which is creation order.
    jobs: Vec<Job>,
    companies: Vec<Company>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
    profiles: HashMap<String, UserProfile>,
    saved_jobs: HashMap<String, Vec<Uuid>>,
}

/// In-memory store for jobs, companies, applications, profiles and
/// notifications. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPortal {
    data: RwLock<PortalData>,
}

impl InMemoryPortal {
    /// Creates an empty portal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_owner(principal: &Principal, owner_id: &str, what: &str) -> JobPortalResult<()> {
    if principal.role == Role::Admin || principal.id == owner_id {
        return Ok(());
    }
    Err(JobPortalError::forbidden(format!(
        "{} belongs to another user",
        what
    )))
}

impl PortalData {
    fn job(&self, id: Uuid) -> JobPortalResult<&Job> {
        self.jobs
            .iter()
            .find(|job| job.id == id)
            .ok_or_else(|| JobPortalError::not_found("Job", id))
    }

    fn company(&self, id: Uuid) -> JobPortalResult<&Company> {
        self.companies
            .iter()
            .find(|company| company.id == id)
            .ok_or_else(|| JobPortalError::not_found("Company", id))
    }
}

#[async_trait]
impl JobService for InMemoryPortal {
    async fn post_job(&self, principal: &Principal, request: PostJobRequest) -> JobPortalResult<Job> {
        principal.require_any_role(&[Role::Recruiter])?;
        request.validate_request()?;

        let mut data = self.data.write();
        let company = data.company(request.company_id)?;
        ensure_owner(principal, &company.owner_id, "Company")?;

        let job = Job {
            id: Uuid::now_v7(),
            title: request.title.trim().to_string(),
            description: request.description,
            requirements: request.requirements,
            salary: request.salary,
            location: request.location,
            job_type: request.job_type,
            positions: request.positions,
            company_id: request.company_id,
            created_by: principal.id.clone(),
            created_at: Utc::now(),
        };
        data.jobs.push(job.clone());

        info!("Job posted: {} by {}", job.id, principal.id);
        Ok(job)
    }

    async fn list_jobs(&self, keyword: Option<&str>) -> JobPortalResult<Vec<Job>> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let data = self.data.read();
        Ok(data
            .jobs
            .iter()
            .rev()
            .filter(|job| keyword.map_or(true, |k| job.matches(k)))
            .cloned()
            .collect())
    }

    async fn get_job(&self, id: Uuid) -> JobPortalResult<Job> {
        self.data.read().job(id).cloned()
    }

    async fn admin_jobs(&self, principal: &Principal) -> JobPortalResult<Vec<Job>> {
        principal.require_any_role(&[Role::Recruiter])?;
        let data = self.data.read();
        Ok(data
            .jobs
            .iter()
            .rev()
            .filter(|job| job.created_by == principal.id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CompanyService for InMemoryPortal {
    async fn register_company(
        &self,
        principal: &Principal,
        request: RegisterCompanyRequest,
    ) -> JobPortalResult<Company> {
        principal.require_any_role(&[Role::Recruiter])?;
        request.validate_request()?;

        let name = request.name.trim().to_string();
        let mut data = self.data.write();
        if data
            .companies
            .iter()
            .any(|company| company.name.eq_ignore_ascii_case(&name))
        {
            return Err(JobPortalError::conflict(format!(
                "Company '{}' already exists",
                name
            )));
        }

        let company = Company {
            id: Uuid::now_v7(),
            name,
            description: None,
            website: None,
            location: None,
            owner_id: principal.id.clone(),
            created_at: Utc::now(),
        };
        data.companies.push(company.clone());

        info!("Company registered: {} by {}", company.id, principal.id);
        Ok(company)
    }

    async fn list_companies(&self, principal: &Principal) -> JobPortalResult<Vec<Company>> {
        principal.require_any_role(&[Role::Recruiter])?;
        let data = self.data.read();
        Ok(data
            .companies
            .iter()
            .filter(|company| company.owner_id == principal.id)
            .cloned()
            .collect())
    }

    async fn get_company(&self, id: Uuid) -> JobPortalResult<Company> {
        self.data.read().company(id).cloned()
    }

    async fn update_company(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateCompanyRequest,
    ) -> JobPortalResult<Company> {
        principal.require_any_role(&[Role::Recruiter])?;
        request.validate_request()?;

        let mut data = self.data.write();
        let owner_id = data.company(id)?.owner_id.clone();
        ensure_owner(principal, &owner_id, "Company")?;

        if let Some(name) = request.name.as_deref().map(str::trim) {
            if data
                .companies
                .iter()
                .any(|company| company.id != id && company.name.eq_ignore_ascii_case(name))
            {
                return Err(JobPortalError::conflict(format!(
                    "Company '{}' already exists",
                    name
                )));
            }
        }

        let company = data
            .companies
            .iter_mut()
            .find(|company| company.id == id)
            .ok_or_else(|| JobPortalError::not_found("Company", id))?;

        if let Some(name) = request.name {
            company.name = name.trim().to_string();
        }
        if request.description.is_some() {
            company.description = request.description;
        }
        if request.website.is_some() {
            company.website = request.website;
        }
        if request.location.is_some() {
            company.location = request.location;
        }

        debug!("Company updated: {}", id);
        Ok(company.clone())
    }
}

#[async_trait]
impl ApplicationService for InMemoryPortal {
    async fn apply(&self, principal: &Principal, job_id: Uuid) -> JobPortalResult<Application> {
        principal.require_any_role(&[Role::Student])?;

        let mut data = self.data.write();
        data.job(job_id)?;
        if data
            .applications
            .iter()
            .any(|app| app.job_id == job_id && app.applicant_id == principal.id)
        {
            return Err(JobPortalError::conflict("You have already applied for this job"));
        }

        let now = Utc::now();
        let application = Application {
            id: Uuid::now_v7(),
            job_id,
            applicant_id: principal.id.clone(),
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        data.applications.push(application.clone());

        info!("Application {} created for job {}", application.id, job_id);
        Ok(application)
    }

    async fn applied_jobs(&self, principal: &Principal) -> JobPortalResult<Vec<AppliedJob>> {
        principal.require_authenticated()?;
        let data = self.data.read();
        Ok(data
            .applications
            .iter()
            .rev()
            .filter(|app| app.applicant_id == principal.id)
            .filter_map(|app| {
                data.job(app.job_id).ok().map(|job| AppliedJob {
                    application: app.clone(),
                    job: job.clone(),
                })
            })
            .collect())
    }

    async fn applicants(&self, principal: &Principal, job_id: Uuid) -> JobPortalResult<Vec<Application>> {
        principal.require_any_role(&[Role::Recruiter])?;
        let data = self.data.read();
        let job = data.job(job_id)?;
        ensure_owner(principal, &job.created_by, "Job")?;

        Ok(data
            .applications
            .iter()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        principal: &Principal,
        application_id: Uuid,
        request: UpdateStatusRequest,
    ) -> JobPortalResult<Application> {
        principal.require_any_role(&[Role::Recruiter])?;

        let mut data = self.data.write();
        let job_id = data
            .applications
            .iter()
            .find(|app| app.id == application_id)
            .map(|app| app.job_id)
            .ok_or_else(|| JobPortalError::not_found("Application", application_id))?;
        let job_title = {
            let job = data.job(job_id)?;
            ensure_owner(principal, &job.created_by, "Job")?;
            job.title.clone()
        };

        let application = data
            .applications
            .iter_mut()
            .find(|app| app.id == application_id)
            .ok_or_else(|| JobPortalError::not_found("Application", application_id))?;
        application.status = request.status;
        application.updated_at = Utc::now();
        let application = application.clone();

        data.notifications.push(Notification {
            id: Uuid::now_v7(),
            recipient_id: application.applicant_id.clone(),
            message: format!(
                "Your application for '{}' is now {}",
                job_title,
                request.status.as_str()
            ),
            read: false,
            created_at: Utc::now(),
        });

        info!(
            "Application {} moved to {}",
            application_id,
            request.status.as_str()
        );
        Ok(application)
    }
}

#[async_trait]
impl UserService for InMemoryPortal {
    async fn profile(&self, principal: &Principal) -> JobPortalResult<UserProfile> {
        principal.require_authenticated()?;
        let data = self.data.read();
        Ok(data
            .profiles
            .get(&principal.id)
            .cloned()
            .unwrap_or_else(|| UserProfile::blank(&principal.id, principal.role)))
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        request: UpdateProfileRequest,
    ) -> JobPortalResult<UserProfile> {
        principal.require_authenticated()?;
        request.validate_request()?;

        let mut data = self.data.write();
        let profile = data
            .profiles
            .entry(principal.id.clone())
            .or_insert_with(|| UserProfile::blank(&principal.id, principal.role));

        if request.full_name.is_some() {
            profile.full_name = request.full_name;
        }
        if request.email.is_some() {
            profile.email = request.email;
        }
        if request.phone_number.is_some() {
            profile.phone_number = request.phone_number;
        }
        if request.bio.is_some() {
            profile.bio = request.bio;
        }
        if let Some(skills) = request.skills {
            profile.skills = skills
                .into_iter()
                .map(|skill| skill.trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect();
        }
        profile.updated_at = Utc::now();

        debug!("Profile updated: {}", principal.id);
        Ok(profile.clone())
    }

    async fn saved_jobs(&self, principal: &Principal) -> JobPortalResult<Vec<Job>> {
        principal.require_authenticated()?;
        let data = self.data.read();
        let Some(ids) = data.saved_jobs.get(&principal.id) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| data.job(*id).ok().cloned())
            .collect())
    }

    async fn toggle_saved_job(&self, principal: &Principal, job_id: Uuid) -> JobPortalResult<SavedJobToggle> {
        principal.require_authenticated()?;

        let mut data = self.data.write();
        data.job(job_id)?;
        let ids = data.saved_jobs.entry(principal.id.clone()).or_default();

        let saved = if let Some(pos) = ids.iter().position(|id| *id == job_id) {
            ids.remove(pos);
            false
        } else {
            ids.push(job_id);
            true
        };

        debug!("Saved job {} for {}: {}", job_id, principal.id, saved);
        Ok(SavedJobToggle { job_id, saved })
    }

    async fn notifications(&self, principal: &Principal) -> JobPortalResult<Vec<Notification>> {
        principal.require_authenticated()?;
        let data = self.data.read();
        Ok(data
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == principal.id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, principal: &Principal, id: Uuid) -> JobPortalResult<Notification> {
        principal.require_authenticated()?;

        let mut data = self.data.write();
        let notification = data
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == principal.id)
            .ok_or_else(|| JobPortalError::not_found("Notification", id))?;
        notification.read = true;
        Ok(notification.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recruiter() -> Principal {
        Principal::new("R1", Role::Recruiter)
    }

    fn student() -> Principal {
        Principal::new("S1", Role::Student)
    }

    fn job_request(company_id: Uuid, title: &str) -> PostJobRequest {
        PostJobRequest {
            title: title.to_string(),
            description: "Build and run services".to_string(),
            requirements: vec!["Rust".to_string()],
            salary: Some(90_000),
            location: "Remote".to_string(),
            job_type: "full-time".to_string(),
            positions: 2,
            company_id,
        }
    }

    async fn portal_with_job() -> (InMemoryPortal, Job) {
        let portal = InMemoryPortal::new();
        let company = portal
            .register_company(&recruiter(), RegisterCompanyRequest { name: "Acme".to_string() })
            .await
            .unwrap();
        let job = portal
            .post_job(&recruiter(), job_request(company.id, "Rust Engineer"))
            .await
            .unwrap();
        (portal, job)
    }

    #[tokio::test]
    async fn test_post_and_list_jobs() {
        let (portal, job) = portal_with_job().await;
        let company_id = job.company_id;
        portal
            .post_job(&recruiter(), job_request(company_id, "Go Developer"))
            .await
            .unwrap();

        let all = portal.list_jobs(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Go Developer");

        let rust = portal.list_jobs(Some("rust")).await.unwrap();
        assert_eq!(rust, vec![job.clone()]);

        assert_eq!(portal.get_job(job.id).await.unwrap(), job);
        assert_eq!(portal.admin_jobs(&recruiter()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_post_job_requires_recruiter_and_owned_company() {
        let (portal, job) = portal_with_job().await;

        let err = portal
            .post_job(&student(), job_request(job.company_id, "Intern"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let other = Principal::new("R2", Role::Recruiter);
        let err = portal
            .post_job(&other, job_request(job.company_id, "Intern"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = portal
            .post_job(&recruiter(), job_request(job.company_id, "  "))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_get_missing_job_is_not_found() {
        let portal = InMemoryPortal::new();
        let err = portal.get_job(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_company_names_are_unique() {
        let portal = InMemoryPortal::new();
        portal
            .register_company(&recruiter(), RegisterCompanyRequest { name: "Acme".to_string() })
            .await
            .unwrap();
        let err = portal
            .register_company(&recruiter(), RegisterCompanyRequest { name: "ACME".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_update_company_by_owner_only() {
        let portal = InMemoryPortal::new();
        let company = portal
            .register_company(&recruiter(), RegisterCompanyRequest { name: "Acme".to_string() })
            .await
            .unwrap();

        let update = UpdateCompanyRequest {
            location: Some("Lisbon".to_string()),
            ..UpdateCompanyRequest::default()
        };
        let updated = portal
            .update_company(&recruiter(), company.id, update.clone())
            .await
            .unwrap();
        assert_eq!(updated.location.as_deref(), Some("Lisbon"));
        assert_eq!(updated.name, "Acme");

        let other = Principal::new("R2", Role::Recruiter);
        let err = portal.update_company(&other, company.id, update).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_apply_twice_conflicts() {
        let (portal, job) = portal_with_job().await;
        portal.apply(&student(), job.id).await.unwrap();
        let err = portal.apply(&student(), job.id).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        let applied = portal.applied_jobs(&student()).await.unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].job.id, job.id);
    }

    #[tokio::test]
    async fn test_status_update_notifies_applicant() {
        let (portal, job) = portal_with_job().await;
        let application = portal.apply(&student(), job.id).await.unwrap();

        let applicants = portal.applicants(&recruiter(), job.id).await.unwrap();
        assert_eq!(applicants, vec![application.clone()]);

        let updated = portal
            .update_status(
                &recruiter(),
                application.id,
                UpdateStatusRequest { status: ApplicationStatus::Accepted },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Accepted);

        let notifications = portal.notifications(&student()).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.contains("accepted"));
        assert!(!notifications[0].read);

        let read = portal
            .mark_notification_read(&student(), notifications[0].id)
            .await
            .unwrap();
        assert!(read.read);

        let err = portal
            .mark_notification_read(&recruiter(), notifications[0].id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_profile_defaults_and_updates() {
        let portal = InMemoryPortal::new();
        let blank = portal.profile(&student()).await.unwrap();
        assert_eq!(blank.id, "S1");
        assert!(blank.full_name.is_none());

        let updated = portal
            .update_profile(
                &student(),
                UpdateProfileRequest {
                    full_name: Some("Sam Doe".to_string()),
                    skills: Some(vec!["rust".to_string(), " ".to_string()]),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Sam Doe"));
        assert_eq!(updated.skills, vec!["rust".to_string()]);
        assert_eq!(portal.profile(&student()).await.unwrap(), updated);

        let err = portal.profile(&Principal::guest()).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_toggle_saved_job() {
        let (portal, job) = portal_with_job().await;

        let first = portal.toggle_saved_job(&student(), job.id).await.unwrap();
        assert!(first.saved);
        assert_eq!(portal.saved_jobs(&student()).await.unwrap(), vec![job.clone()]);

        let second = portal.toggle_saved_job(&student(), job.id).await.unwrap();
        assert!(!second.saved);
        assert!(portal.saved_jobs(&student()).await.unwrap().is_empty());
    }
}
