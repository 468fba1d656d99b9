use std::fmt;
use std::io::{self, Read, Write};

use serde::Deserialize;

use crate::cloudflare::{ListDirectory, ListMutator};
use crate::core::{validate, IpAddress};
use crate::utils::{IntelError, IntelResult};

/// Step of a blocking attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStage {
    Validating,
    ListResolving,
    Mutating,
}

impl fmt::Display for BlockStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockStage::Validating => "validating",
            BlockStage::ListResolving => "list resolving",
            BlockStage::Mutating => "mutating",
        };
        f.write_str(name)
    }
}

/// A blocking attempt that stopped at `stage`
#[derive(Debug)]
pub struct BlockFailure {
    pub stage: BlockStage,
    pub error: IntelError,
}

impl BlockFailure {
    fn at(stage: BlockStage) -> impl FnOnce(IntelError) -> BlockFailure {
        move |error| BlockFailure { stage, error }
    }
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blocking failed while {}: {}", self.stage, self.error)
    }
}

impl std::error::Error for BlockFailure {}

/// Confirmation of an IP appended to the blocklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReceipt {
    pub ip: IpAddress,
    pub list_id: String,
    pub operation_id: Option<String>,
}

/// Validates an IP, resolves the target list, then appends the IP to it
///
/// Each step runs only if the previous one succeeded. The failing component
/// has already logged the detail when a [`BlockFailure`] is returned.
pub struct BlockingService<D, M> {
    directory: D,
    mutator: M,
    list_name: String,
}

impl<D, M> BlockingService<D, M>
where
    D: ListDirectory,
    M: ListMutator,
{
    pub fn new(directory: D, mutator: M, list_name: impl Into<String>) -> Self {
        Self {
            directory,
            mutator,
            list_name: list_name.into(),
        }
    }

    /// Name of the list IPs are added to
    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    /// Run one blocking attempt for `raw`
    pub async fn block_ip(&self, raw: &str) -> Result<BlockReceipt, BlockFailure> {
        let ip = validate(raw).map_err(|e| {
            tracing::error!(ip = %raw, "{}", e);
            BlockFailure::at(BlockStage::Validating)(e)
        })?;

        let list_id = self
            .directory
            .find_list(&self.list_name)
            .await
            .map_err(BlockFailure::at(BlockStage::ListResolving))?;

        let operation_id = self
            .mutator
            .add_entry(&list_id, &ip)
            .await
            .map_err(BlockFailure::at(BlockStage::Mutating))?;

        Ok(BlockReceipt {
            ip,
            list_id,
            operation_id,
        })
    }
}

/// Process exit status of a successful block
pub const EXIT_BLOCKED: u8 = 0;
/// Process exit status of any failed attempt
pub const EXIT_FAILED: u8 = 1;

/// Write the blocker's single outcome line to `out` and return its exit status
pub fn write_outcome<W: Write>(
    out: &mut W,
    ip: &str,
    list_name: &str,
    blocked: bool,
) -> io::Result<u8> {
    if blocked {
        writeln!(out, "IP {} blocked successfully in list '{}'", ip, list_name)?;
        Ok(EXIT_BLOCKED)
    } else {
        writeln!(out, "Failed to block IP {}", ip)?;
        Ok(EXIT_FAILED)
    }
}

#[derive(Debug, Deserialize)]
struct Alert {
    data: Option<AlertData>,
}

#[derive(Debug, Deserialize)]
struct AlertData {
    cloudflare: Option<CloudflareEvent>,
}

#[derive(Debug, Deserialize)]
struct CloudflareEvent {
    #[serde(rename = "clientIP")]
    client_ip: Option<String>,
}

/// Extract `data.cloudflare.clientIP` from an alert JSON document
pub fn extract_client_ip<R: Read>(reader: R) -> IntelResult<String> {
    let alert: Alert = serde_json::from_reader(reader)
        .map_err(|e| IntelError::InvalidInput(format!("Error reading alert: {}", e)))?;

    alert
        .data
        .and_then(|data| data.cloudflare)
        .and_then(|event| event.client_ip)
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| IntelError::InvalidInput("IP not found in alert".to_string()))
}
