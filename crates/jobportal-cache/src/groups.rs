//! Cache groups and the routes they cover.
//!
//! Route paths live here, next to the table that maps groups to them, so
//! the router registers exactly the paths that invalidation deletes.

use crate::keys::principal_prefix;
use jobportal_core::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Route templates of cached and mutating endpoints.
pub mod paths {
    pub const API_BASE: &str = "/api/v1";

    pub const JOB_POST: &str = "/api/v1/job/post";
    pub const JOB_LIST: &str = "/api/v1/job/get";
    pub const JOB_BY_ID: &str = "/api/v1/job/get/:id";
    pub const JOB_ADMIN_LIST: &str = "/api/v1/job/getadminjobs";

    pub const COMPANY_REGISTER: &str = "/api/v1/company/register";
    pub const COMPANY_LIST: &str = "/api/v1/company/get";
    pub const COMPANY_BY_ID: &str = "/api/v1/company/get/:id";
    pub const COMPANY_UPDATE: &str = "/api/v1/company/update/:id";

    pub const APPLICATION_APPLY: &str = "/api/v1/application/apply/:id";
    pub const APPLICATION_LIST: &str = "/api/v1/application/get";
    pub const APPLICATION_APPLICANTS_PREFIX: &str = "/api/v1/application/applicants";
    pub const APPLICATION_APPLICANTS: &str = "/api/v1/application/applicants/:id";
    pub const APPLICATION_STATUS: &str = "/api/v1/application/status/:id/update";

    pub const USER_PROFILE: &str = "/api/v1/user/profile";
    pub const USER_PROFILE_UPDATE: &str = "/api/v1/user/profile/update";
    pub const SAVED_JOBS: &str = "/api/v1/user/saved-jobs";
    pub const SAVED_JOBS_TOGGLE: &str = "/api/v1/user/saved-jobs/:id";

    pub const NOTIFICATION_LIST: &str = "/api/v1/notification/get";
    pub const NOTIFICATION_READ: &str = "/api/v1/notification/read/:id";
}

/// A named set of routes invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheGroup {
    Jobs,
    Companies,
    Applications,
    /// Scoped to the caller: only the mutating principal's entries go.
    User,
    SavedJobs,
    Notifications,
}

enum Prefixes {
    /// Same prefixes for every caller.
    Shared(&'static [&'static str]),
    /// Route prefixes narrowed to the calling principal.
    PerPrincipal(&'static [&'static str]),
}

const GROUP_TABLE: &[(CacheGroup, Prefixes)] = &[
    (
        CacheGroup::Jobs,
        Prefixes::Shared(&[paths::JOB_LIST, paths::JOB_ADMIN_LIST]),
    ),
    (CacheGroup::Companies, Prefixes::Shared(&[paths::COMPANY_LIST])),
    (
        CacheGroup::Applications,
        Prefixes::Shared(&[paths::APPLICATION_LIST, paths::APPLICATION_APPLICANTS_PREFIX]),
    ),
    (CacheGroup::User, Prefixes::PerPrincipal(&[paths::USER_PROFILE])),
    (CacheGroup::SavedJobs, Prefixes::Shared(&[paths::SAVED_JOBS])),
    (
        CacheGroup::Notifications,
        Prefixes::Shared(&[paths::NOTIFICATION_LIST]),
    ),
];

impl CacheGroup {
    /// Every group, in table order.
    pub const ALL: [Self; 6] = [
        Self::Jobs,
        Self::Companies,
        Self::Applications,
        Self::User,
        Self::SavedJobs,
        Self::Notifications,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Jobs => "jobs",
            Self::Companies => "companies",
            Self::Applications => "applications",
            Self::User => "user",
            Self::SavedJobs => "saved_jobs",
            Self::Notifications => "notifications",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.name() == s)
    }

    /// Resolves the key prefixes to delete when this group is invalidated
    /// by `principal`.
    #[must_use]
    pub fn prefixes(&self, principal: &Principal) -> Vec<String> {
        let Some((_, prefixes)) = GROUP_TABLE.iter().find(|(group, _)| group == self) else {
            return Vec::new();
        };

        match prefixes {
            Prefixes::Shared(routes) => routes.iter().map(|route| (*route).to_string()).collect(),
            Prefixes::PerPrincipal(routes) => routes
                .iter()
                .map(|route| principal_prefix(route, principal))
                .collect(),
        }
    }
}

impl fmt::Display for CacheGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
