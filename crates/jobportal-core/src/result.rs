//! Result type aliases for JobPortal.

use crate::JobPortalError;

/// A specialized `Result` type for JobPortal operations.
pub type JobPortalResult<T> = Result<T, JobPortalError>;
