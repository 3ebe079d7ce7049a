//! Contract metadata loading and per-role binding resolution.
//!
//! The metadata file is JSON keyed by role:
//!
//! ```json
//! {
//!   "source":      { "address": "0x…", "abi": [...], "warden_key": "0x…" },
//!   "destination": { "address": "0x…", "abi": [...], "warden_key": "0x…" }
//! }
//! ```
//!
//! A failure to load or resolve is fatal: it indicates a deployment/config
//! mismatch, not a transient condition, and is never retried.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Role;

pub const DEPOSIT_EVENT: &str = "Deposit";
pub const UNWRAP_EVENT: &str = "Unwrap";

/// One role's raw metadata entry as stored on disk.
#[derive(Clone, Deserialize)]
struct RawEntry {
    address: String,
    abi: JsonAbi,
    warden_key: String,
}

/// Resolves, per logical chain role, the deployed contract address, ABI, and
/// the relay's operating credential.
pub struct ContractRegistry {
    entries: HashMap<String, RawEntry>,
}

impl ContractRegistry {
    /// Load the metadata file once per process.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::MetadataUnreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::from_json(&raw)
    }

    /// Parse metadata from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let entries: HashMap<String, RawEntry> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    /// Resolve a role into an immutable [`ContractBinding`].
    ///
    /// Fails when the role is missing from the file, the address or warden
    /// key does not parse, or the ABI lacks the Deposit/Unwrap events.
    pub fn resolve(&self, role: Role) -> Result<ContractBinding, ConfigError> {
        let entry = self
            .entries
            .get(role.as_str())
            .ok_or_else(|| ConfigError::UnknownRole(role.as_str().to_string()))?;

        let address: Address =
            entry
                .address
                .parse()
                .map_err(|_| ConfigError::InvalidAddress {
                    role: role.as_str().to_string(),
                    value: entry.address.clone(),
                })?;

        let signer: PrivateKeySigner =
            entry.warden_key.parse().map_err(|_| ConfigError::InvalidKey {
                role: role.as_str().to_string(),
            })?;
        let operating_address = signer.address();

        let deposit_event = abi_event(&entry.abi, role, DEPOSIT_EVENT)?;
        let unwrap_event = abi_event(&entry.abi, role, UNWRAP_EVENT)?;
        let deposit_topic = deposit_event.selector();
        let unwrap_topic = unwrap_event.selector();

        Ok(ContractBinding {
            role,
            address,
            deposit_event,
            unwrap_event,
            deposit_topic,
            unwrap_topic,
            operating_address,
            signer,
        })
    }
}

fn abi_event(abi: &JsonAbi, role: Role, name: &'static str) -> Result<Event, ConfigError> {
    abi.events
        .get(name)
        .and_then(|overloads| overloads.first())
        .cloned()
        .ok_or(ConfigError::MissingEvent {
            role: role.as_str().to_string(),
            event: name,
        })
}

/// One role's resolved contract binding: address, event definitions with
/// precomputed signature topics, and the warden's signing credential.
///
/// Created at the start of a scan invocation and immutable for its duration.
#[derive(Clone)]
pub struct ContractBinding {
    pub role: Role,
    pub address: Address,
    pub deposit_event: Event,
    pub unwrap_event: Event,
    /// keccak256 of the canonical Deposit signature from the loaded ABI.
    pub deposit_topic: B256,
    /// keccak256 of the canonical Unwrap signature from the loaded ABI.
    pub unwrap_topic: B256,
    /// Address derived from the warden key; its transaction count is the
    /// next nonce.
    pub operating_address: Address,
    pub signer: PrivateKeySigner,
}

/// Custom Debug that redacts the warden key to prevent accidental log leakage.
impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("role", &self.role)
            .field("address", &self.address)
            .field("deposit_topic", &self.deposit_topic)
            .field("unwrap_topic", &self.unwrap_topic)
            .field("operating_address", &self.operating_address)
            .field("signer", &"<redacted>")
            .finish()
    }
}
