use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::CloudflareConfig;
use crate::utils::{IntelError, IntelResult};

/// Represents a Cloudflare API response
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    #[serde(default)]
    pub success: bool,
    /// Kept raw: Cloudflare sends `{code, message}` objects, proxies may send strings
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    pub result: Option<T>,
}

/// An account-level IP list
#[derive(Debug, Clone, Deserialize)]
pub struct IpList {
    pub id: String,
    pub name: String,
}

/// One item posted to an IP list
#[derive(Debug, Clone, Serialize)]
pub struct ListItem {
    pub ip: String,
    pub comment: String,
}

/// Result of an asynchronous list mutation
#[derive(Debug, Clone, Deserialize)]
pub struct ListOperation {
    pub operation_id: Option<String>,
}

/// Client for interacting with Cloudflare's account list API
#[derive(Clone)]
pub struct CloudflareClient {
    client: ReqwestClient,
    api_token: String,
    account_id: String,
    base_url: String,
}

impl CloudflareClient {
    /// Creates a new Cloudflare client
    pub fn new(config: &CloudflareConfig) -> IntelResult<Self> {
        Ok(Self {
            client: ReqwestClient::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()?,
            api_token: config.api_token.clone(),
            account_id: config.account_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists all IP lists of the account
    pub async fn list_ip_lists(&self) -> IntelResult<CloudflareResponse<Vec<IpList>>> {
        let url = format!("{}/accounts/{}/rules/lists", self.base_url, self.account_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await?;

        decode(response).await
    }

    /// Appends items to the list `list_id`
    pub async fn add_list_items(
        &self,
        list_id: &str,
        items: &[ListItem],
    ) -> IntelResult<CloudflareResponse<ListOperation>> {
        let url = format!(
            "{}/accounts/{}/rules/lists/{}/items",
            self.base_url, self.account_id, list_id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(items)
            .send()
            .await?;

        decode(response).await
    }
}

/// Reject non-2xx statuses, then decode the envelope
async fn decode<T: DeserializeOwned>(response: Response) -> IntelResult<CloudflareResponse<T>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IntelError::Service {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| IntelError::MalformedResponse(e.to_string()))
}
