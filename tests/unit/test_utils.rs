use rand::Rng;
use threat_intel_pipeline::config::{CloudflareConfig, RdapConfig, ReputationConfig};

pub const API_KEY: &str = "test-key";
pub const API_TOKEN: &str = "test-token";
pub const ACCOUNT_ID: &str = "acct-123";

/// Generate a random IP address for testing
pub fn random_ip() -> String {
    format!(
        "{}.{}.{}.{}",
        rand::random::<u8>(),
        rand::random::<u8>(),
        rand::random::<u8>(),
        rand::random::<u8>()
    )
}

/// Generate a full-form IPv6 literal with random group widths and letter case
pub fn random_full_ipv6() -> String {
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| {
            let width = rng.gen_range(1..=4);
            let group = format!("{:04x}", rng.gen::<u16>());
            let group = &group[4 - width..];
            if rng.gen_bool(0.5) {
                group.to_uppercase()
            } else {
                group.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(":")
}

pub fn reputation_config(base_url: &str) -> ReputationConfig {
    ReputationConfig {
        api_key: API_KEY.to_string(),
        base_url: base_url.to_string(),
        max_age_days: 90,
        requests_per_minute: 60_000,
        timeout_seconds: 5,
    }
}

pub fn rdap_config(base_url: &str) -> RdapConfig {
    RdapConfig {
        base_url: base_url.to_string(),
        max_referrals: 1,
        timeout_seconds: 5,
    }
}

pub fn cloudflare_config(base_url: &str) -> CloudflareConfig {
    CloudflareConfig {
        api_token: API_TOKEN.to_string(),
        account_id: ACCOUNT_ID.to_string(),
        list_name: "blacklist".to_string(),
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        comment_prefix: "Blocked via Wazuh".to_string(),
    }
}

/// AbuseIPDB `check` payload
pub fn check_body(ip: &str, score: u8, country: &str, reports: u64) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "ipAddress": ip,
            "isPublic": true,
            "abuseConfidenceScore": score,
            "countryCode": country,
            "totalReports": reports,
            "lastReportedAt": null
        }
    })
}
