use async_trait::async_trait;
use reqwest::{redirect::Policy, Client as ReqwestClient, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::RdapConfig;
use crate::rdap::{ProviderLookup, ProviderName};
use crate::utils::{IntelError, IntelResult};

/// RDAP IP network object, reduced to the fields used for display
#[derive(Debug, Default, Deserialize)]
struct IpNetwork {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entity {
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    vcard_array: Option<Value>,
}

/// RDAP client that follows registry referrals through HTTP redirects
pub struct RdapResolver {
    client: ReqwestClient,
    base_url: String,
}

impl RdapResolver {
    /// Creates a new RDAP resolver
    pub fn new(config: &RdapConfig) -> IntelResult<Self> {
        Ok(Self {
            client: ReqwestClient::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .redirect(Policy::limited(config.max_referrals))
                .build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and decode the network object registered for `ip`
    async fn lookup(&self, ip: &str) -> IntelResult<IpNetwork> {
        let url = format!("{}/ip/{}", self.base_url, ip);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/rdap+json")
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
        serde_json::from_str(&body).map_err(|e| IntelError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ProviderLookup for RdapResolver {
    async fn resolve_provider(&self, ip: &str) -> ProviderName {
        match self.lookup(ip).await {
            Ok(network) => match display_name(&network) {
                Some(name) => ProviderName::Resolved(name),
                None => {
                    tracing::warn!(ip = %ip, "RDAP record carries no network or holder name");
                    ProviderName::Unknown
                }
            },
            Err(e) => {
                tracing::warn!(ip = %ip, error = %e, "RDAP lookup failed");
                ProviderName::Unknown
            }
        }
    }
}

/// Network name first, then the registrant's formatted name
///
/// Plain RDAP IP responses carry no autonomous-system description, so the
/// registrant's vCard `fn` stands in for it as the second fallback.
fn display_name(network: &IpNetwork) -> Option<String> {
    non_empty(network.name.as_deref()).or_else(|| {
        network
            .entities
            .iter()
            .filter(|entity| entity.roles.iter().any(|role| role == "registrant"))
            .find_map(|entity| entity.vcard_array.as_ref().and_then(vcard_fn))
    })
}

/// Extract the `fn` property from a jCard: `["vcard", [["fn", {}, "text", "Google LLC"], ...]]`
fn vcard_fn(vcard: &Value) -> Option<String> {
    vcard
        .get(1)?
        .as_array()?
        .iter()
        .find(|property| property.get(0).and_then(Value::as_str) == Some("fn"))
        .and_then(|property| non_empty(property.get(3)?.as_str()))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
