//! The caller identity attached to every request.

use crate::{JobPortalError, JobPortalResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier used for both the id and the role of unauthenticated callers.
pub const GUEST: &str = "guest";

/// Portal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unauthenticated caller.
    #[default]
    Guest,
    /// Job seeker.
    Student,
    /// Posts jobs and manages companies.
    Recruiter,
    /// Full access.
    Admin,
}

impl Role {
    /// Returns the role's name as used in cache keys and tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => GUEST,
            Self::Student => "student",
            Self::Recruiter => "recruiter",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(Self::Guest),
            "student" | "candidate" => Some(Self::Student),
            "recruiter" => Some(Self::Recruiter),
            "admin" | "administrator" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated caller, or the guest principal.
///
/// Inserted into request extensions by the auth middleware. Anything that
/// needs the caller and finds no extension uses [`Principal::guest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    /// Creates an authenticated principal.
    ///
    /// An empty id degrades to the guest principal.
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        let id = id.into();
        if id.trim().is_empty() {
            return Self::guest();
        }
        Self { id, role }
    }

    /// The unauthenticated principal.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: GUEST.to_string(),
            role: Role::Guest,
        }
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.role == Role::Guest
    }

    /// Fails with `Unauthorized` for guests.
    pub fn require_authenticated(&self) -> JobPortalResult<()> {
        if self.is_guest() {
            return Err(JobPortalError::unauthorized("Authentication required"));
        }
        Ok(())
    }

    /// Fails unless the caller has one of `roles`. Admins always pass.
    pub fn require_any_role(&self, roles: &[Role]) -> JobPortalResult<()> {
        self.require_authenticated()?;
        if self.role == Role::Admin || roles.contains(&self.role) {
            return Ok(());
        }
        Err(JobPortalError::forbidden(format!(
            "Role '{}' may not perform this action",
            self.role
        )))
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::guest()
    }
}
