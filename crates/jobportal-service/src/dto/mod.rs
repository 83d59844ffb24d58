//! Request payloads.

mod application_dto;
mod company_dto;
mod job_dto;
mod user_dto;

pub use application_dto::*;
pub use company_dto::*;
pub use job_dto::*;
pub use user_dto::*;
