//! # JobPortal Service
//!
//! Job, company, application and user services behind async traits, with a
//! process-local implementation backing all of them.

pub mod application_service;
pub mod company_service;
pub mod dto;
pub mod job_service;
pub mod models;
pub mod portal;
pub mod user_service;

pub use application_service::*;
pub use company_service::*;
pub use dto::*;
pub use job_service::*;
pub use models::*;
pub use portal::InMemoryPortal;
pub use user_service::*;
