use async_trait::async_trait;
use chrono::Local;

use crate::cloudflare::client::{CloudflareClient, ListItem};
use crate::config::CloudflareConfig;
use crate::core::IpAddress;
use crate::utils::{log_cloudflare_event, IntelError, IntelResult};

/// Resolves a list name to its remote identifier
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListDirectory: Send + Sync {
    /// Identifier of the first list whose name matches `name` case-insensitively
    ///
    /// A failed fetch is reported as `NotFound` as well.
    async fn find_list(&self, name: &str) -> IntelResult<String>;
}

/// Appends entries to a remote list
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListMutator: Send + Sync {
    /// Append `ip` to `list_id`; returns the operation id reported by the service
    ///
    /// Attempted exactly once. Duplicate handling is left to the service.
    async fn add_entry(&self, list_id: &str, ip: &IpAddress) -> IntelResult<Option<String>>;
}

/// Manages entries of Cloudflare account IP lists
///
/// Holds no cache: every call goes to the API.
#[derive(Clone)]
pub struct CloudflareListsManager {
    /// Cloudflare API client for making HTTP requests to the Cloudflare API
    client: CloudflareClient,
    /// Leading text of item comments
    comment_prefix: String,
}

impl CloudflareListsManager {
    pub fn new(client: CloudflareClient, config: &CloudflareConfig) -> Self {
        Self {
            client,
            comment_prefix: config.comment_prefix.clone(),
        }
    }

    fn comment(&self) -> String {
        format!(
            "{} at {}",
            self.comment_prefix,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[async_trait]
impl ListDirectory for CloudflareListsManager {
    async fn find_list(&self, name: &str) -> IntelResult<String> {
        // A 2xx reply is matched against `result` whatever the envelope flag says.
        let lists = match self.client.list_ip_lists().await {
            Ok(response) => {
                if !response.success {
                    log_cloudflare_event(
                        "get_lists",
                        false,
                        Some(&format!("API errors: {:?}", response.errors)),
                    );
                }
                response.result.unwrap_or_default()
            }
            Err(e) => {
                log_cloudflare_event("get_lists", false, Some(&format!("Error fetching lists: {}", e)));
                Vec::new()
            }
        };

        let wanted = name.to_lowercase();
        match lists.into_iter().find(|list| list.name.to_lowercase() == wanted) {
            Some(list) => {
                tracing::debug!(list = %list.name, id = %list.id, "list resolved");
                Ok(list.id)
            }
            None => {
                log_cloudflare_event(
                    "find_list",
                    false,
                    Some(&format!(
                        "List '{}' not found. Create it manually in the Cloudflare dashboard.",
                        name
                    )),
                );
                Err(IntelError::NotFound(name.to_string()))
            }
        }
    }
}

#[async_trait]
impl ListMutator for CloudflareListsManager {
    async fn add_entry(&self, list_id: &str, ip: &IpAddress) -> IntelResult<Option<String>> {
        let items = [ListItem {
            ip: ip.to_string(),
            comment: self.comment(),
        }];

        let response = match self.client.add_list_items(list_id, &items).await {
            Ok(response) => response,
            Err(e) => {
                log_cloudflare_event("add_ip", false, Some(&format!("Request error: {}", e)));
                return Err(e);
            }
        };

        // HTTP 200 is not enough: the envelope decides.
        if !response.success {
            let errors = serde_json::to_string(&response.errors).unwrap_or_default();
            log_cloudflare_event("add_ip", false, Some(&format!("API failure: {}", errors)));
            return Err(IntelError::Service {
                status: 200,
                body: errors,
            });
        }

        let operation_id = response.result.and_then(|op| op.operation_id);
        log_cloudflare_event(
            "add_ip",
            true,
            Some(&format!(
                "IP {} added to list {}. Operation ID: {}",
                ip,
                list_id,
                operation_id.as_deref().unwrap_or("none")
            )),
        );
        Ok(operation_id)
    }
}
