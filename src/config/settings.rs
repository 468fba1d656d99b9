use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::{IntelError, IntelResult};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "threat-intel.toml";

/// Prefix for environment overrides, e.g. `THREATINTEL_CLOUDFLARE__API_TOKEN`
const ENV_PREFIX: &str = "THREATINTEL";

/// Configuration settings for both pipelines
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// AbuseIPDB reputation service configuration
    #[serde(default)]
    pub reputation: ReputationConfig,
    /// RDAP resolver configuration
    #[serde(default)]
    pub rdap: RdapConfig,
    /// Cloudflare API configuration
    #[serde(default)]
    pub cloudflare: CloudflareConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reputation service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// API key sent in the `Key` header
    pub api_key: String,
    /// Service root, without the `/api/v2` path
    pub base_url: String,
    /// Lookback window for reports
    pub max_age_days: u32,
    /// Quota of the reputation API
    pub requests_per_minute: u32,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.abuseipdb.com".to_string(),
            max_age_days: 90,
            requests_per_minute: 40,
            timeout_seconds: 30,
        }
    }
}

/// RDAP resolver settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RdapConfig {
    /// Bootstrap server that redirects to the authoritative registry
    pub base_url: String,
    /// Maximum registry referrals (HTTP redirects) followed per lookup
    pub max_referrals: usize,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for RdapConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rdap.org".to_string(),
            max_referrals: 1,
            timeout_seconds: 10,
        }
    }
}

/// Cloudflare-specific configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudflareConfig {
    /// Cloudflare API token with `Account Filter Lists Edit`
    pub api_token: String,
    /// Account owning the IP lists
    pub account_id: String,
    /// Name of the pre-existing IP list
    pub list_name: String,
    /// API root
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Leading text of every list item comment
    pub comment_prefix: String,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            account_id: String::new(),
            list_name: "blacklist".to_string(),
            base_url: "https://api.cloudflare.com/client/v4".to_string(),
            timeout_seconds: 10,
            comment_prefix: "Blocked via Wazuh".to_string(),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Append-only log file; stderr when absent
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Settings {
    /// Load configuration from `path` (if present) and environment variables
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        builder.build()?.try_deserialize()
    }
}

impl ReputationConfig {
    /// Ensure the credentials needed by the enrichment pipeline are present
    pub fn validate(&self) -> IntelResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(missing("reputation.api_key"));
        }
        if self.requests_per_minute == 0 {
            return Err(IntelError::Config(config::ConfigError::Message(
                "reputation.requests_per_minute must be greater than zero".to_string(),
            )));
        }
        Ok(())
    }
}

impl CloudflareConfig {
    /// Ensure the credentials needed by the blocking pipeline are present
    pub fn validate(&self) -> IntelResult<()> {
        if self.api_token.trim().is_empty() {
            return Err(missing("cloudflare.api_token"));
        }
        if self.account_id.trim().is_empty() {
            return Err(missing("cloudflare.account_id"));
        }
        if self.list_name.trim().is_empty() {
            return Err(missing("cloudflare.list_name"));
        }
        Ok(())
    }
}

fn missing(key: &str) -> IntelError {
    IntelError::Config(config::ConfigError::NotFound(key.to_string()))
}
