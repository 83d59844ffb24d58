//! Company service trait definition.

use crate::dto::{RegisterCompanyRequest, UpdateCompanyRequest};
use crate::models::Company;
use async_trait::async_trait;
use jobportal_core::{JobPortalResult, Principal};
use uuid::Uuid;

/// Company service trait.
#[async_trait]
pub trait CompanyService: Send + Sync {
    /// Registers a company owned by the caller. Names are unique.
    async fn register_company(
        &self,
        principal: &Principal,
        request: RegisterCompanyRequest,
    ) -> JobPortalResult<Company>;

    /// Lists the companies owned by the caller.
    async fn list_companies(&self, principal: &Principal) -> JobPortalResult<Vec<Company>>;

    /// Gets a company by ID.
    async fn get_company(&self, id: Uuid) -> JobPortalResult<Company>;

    /// Updates a company the caller owns.
    async fn update_company(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateCompanyRequest,
    ) -> JobPortalResult<Company>;
}
