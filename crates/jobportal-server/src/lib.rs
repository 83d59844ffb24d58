//! # JobPortal Server Library
//!
//! Wires configuration, the cache store, services and the router into a
//! runnable application.

pub mod app;
pub mod startup;

pub use app::App;
