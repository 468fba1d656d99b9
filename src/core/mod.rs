//! Core functionality for the threat intel pipeline.
//! This module contains the pieces that involve no remote service:
//! rate governing and IP syntax validation.

mod rate_governor;
mod ip_validator;

pub use rate_governor::RateGovernor;
pub use ip_validator::{validate, IpAddress};
