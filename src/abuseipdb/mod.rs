//! AbuseIPDB reputation lookups.

mod client;

pub use client::AbuseIpDbClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::utils::IntelResult;

/// Reputation of one IP, as reported by the scoring service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationRecord {
    /// IP address echoed by the service
    pub ip: String,
    /// Abuse confidence score (0-100)
    pub abuse_score: u8,
    /// Country code; `None` for unallocated or private ranges
    pub country_code: Option<String>,
    /// Reports within the lookback window
    pub total_reports: u64,
    /// Most recent report; `None` if never reported
    pub last_reported_at: Option<DateTime<Utc>>,
}

/// A source of IP reputation records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationLookup: Send + Sync {
    /// Look up the reputation of `ip`. Exactly one outbound call, no retries.
    async fn check(&self, ip: &str) -> IntelResult<ReputationRecord>;
}
