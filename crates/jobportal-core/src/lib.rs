//! # JobPortal Core
//!
//! Core types, traits, and error definitions for the JobPortal API.
//! Every other crate in the workspace builds on the error type and the
//! request principal defined here.

pub mod error;
pub mod principal;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use error::*;
pub use principal::*;
pub use result::*;
pub use validation::*;
