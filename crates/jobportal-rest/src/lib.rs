//! # JobPortal REST
//!
//! REST API layer using Axum. Read endpoints sit behind the response cache
//! and write endpoints declare the cache groups they invalidate.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod security;
pub mod state;

pub use router::*;
pub use security::TokenVerifier;
pub use state::*;
