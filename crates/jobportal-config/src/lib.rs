//! # JobPortal Config
//!
//! Configuration management for the JobPortal API.
//! Supports layered configuration from files and environment variables.

mod app_config;
mod loader;
mod ttl;

pub use app_config::*;
pub use loader::*;
pub use ttl::*;
