//! RDAP lookups for the organisation behind an IP.
//!
//! The provider name is cosmetic, so lookups never fail: every error
//! degrades to [`ProviderName::Unknown`].

mod resolver;

pub use resolver::RdapResolver;

use async_trait::async_trait;
use std::fmt;

/// Display name of the network holding an IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderName {
    Resolved(String),
    Unknown,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Resolved(name) => f.write_str(name),
            ProviderName::Unknown => f.write_str("unknown"),
        }
    }
}

/// A source of provider names
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderLookup: Send + Sync {
    /// Resolve the provider of `ip`. Total: failures map to `Unknown`.
    async fn resolve_provider(&self, ip: &str) -> ProviderName;
}
