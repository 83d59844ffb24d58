//! Custom extractors.

mod principal;

pub use principal::CurrentPrincipal;
