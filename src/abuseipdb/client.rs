use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::abuseipdb::{ReputationLookup, ReputationRecord};
use crate::config::ReputationConfig;
use crate::utils::{IntelError, IntelResult};

const CHECK_PATH: &str = "/api/v2/check";

/// Envelope of the `check` endpoint
#[derive(Debug, Deserialize)]
struct CheckResponse {
    data: CheckData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckData {
    ip_address: String,
    abuse_confidence_score: u8,
    // key required, value nullable
    #[serde(deserialize_with = "Option::deserialize")]
    country_code: Option<String>,
    total_reports: u64,
    #[serde(deserialize_with = "Option::deserialize")]
    last_reported_at: Option<DateTime<Utc>>,
}

/// Client for the AbuseIPDB `check` endpoint
pub struct AbuseIpDbClient {
    client: ReqwestClient,
    api_key: String,
    base_url: String,
    max_age_days: u32,
}

impl AbuseIpDbClient {
    /// Creates a new AbuseIPDB client
    pub fn new(config: &ReputationConfig) -> IntelResult<Self> {
        Ok(Self {
            client: ReqwestClient::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_age_days: config.max_age_days,
        })
    }
}

#[async_trait]
impl ReputationLookup for AbuseIpDbClient {
    async fn check(&self, ip: &str) -> IntelResult<ReputationRecord> {
        let url = format!("{}{}", self.base_url, CHECK_PATH);
        let max_age = self.max_age_days.to_string();

        tracing::debug!(ip = %ip, "Querying AbuseIPDB");

        let response = self
            .client
            .get(&url)
            .query(&[("ipAddress", ip), ("maxAgeInDays", max_age.as_str())])
            .header("Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(IntelError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_check_response(&body)
    }
}

/// Decode a `check` payload into a [`ReputationRecord`]
fn parse_check_response(body: &str) -> IntelResult<ReputationRecord> {
    let payload: CheckResponse = serde_json::from_str(body)
        .map_err(|e| IntelError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

    let data = payload.data;
    if data.abuse_confidence_score > 100 {
        return Err(IntelError::MalformedResponse(format!(
            "abuseConfidenceScore out of range: {}",
            data.abuse_confidence_score
        )));
    }

    Ok(ReputationRecord {
        ip: data.ip_address,
        abuse_score: data.abuse_confidence_score,
        country_code: data.country_code,
        total_reports: data.total_reports,
        last_reported_at: data.last_reported_at,
    })
}
