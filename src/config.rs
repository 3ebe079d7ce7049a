//! Environment-driven relayer configuration.
//!
//! Endpoint URLs and chain ids are never hardcoded at use sites; everything
//! the components need is resolved here once and passed in explicitly. The
//! two default networks match the reference deployment (Avalanche Fuji
//! C-chain and BSC testnet), and both can be overridden per role through
//! environment variables.

use std::env;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Role;

/// Minimum sane gas limit for a contract call.
const MIN_GAS_LIMIT: u64 = 21_000;

/// Main configuration for the relayer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the contract metadata file (address, ABI, warden key per role).
    pub contract_info: String,
    pub source: NetworkConfig,
    pub destination: NetworkConfig,
    pub scan: ScanConfig,
}

/// One chain's network parameters.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Chain short name ("avax", "bsc", or a custom name with explicit
    /// RPC URL and chain id).
    pub chain: String,
    pub rpc_url: String,
    /// Numeric chain id carried in every constructed transaction.
    pub chain_id: u64,
}

/// Scan parameters.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// How many blocks behind the tip the window starts.
    pub window: u64,
    /// Conservative fixed gas limit for outbound wrap/withdraw calls.
    pub gas_limit: u64,
    /// Delay between passes in watch mode.
    pub poll_interval_ms: u64,
}

fn default_window() -> u64 {
    5
}

fn default_gas_limit() -> u64 {
    200_000
}

fn default_poll_interval() -> u64 {
    5000
}

fn default_contract_info() -> String {
    "contract_info.json".to_string()
}

/// RPC URL and chain id for the chains the relayer knows out of the box.
/// Both are proof-of-authority testnets; alloy's header decoding accepts
/// their non-standard extra data without a compatibility shim.
fn known_chain(name: &str) -> Option<(&'static str, u64)> {
    match name {
        "avax" => Some(("https://api.avax-test.network/ext/bc/C/rpc", 43113)),
        "bsc" => Some(("https://data-seed-prebsc-1-s1.binance.org:8545", 97)),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Loads a .env file first if one is present.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(".env").exists() {
            dotenvy::from_filename(".env").map_err(|e| {
                ConfigError::Invalid(format!("failed to load .env file: {}", e))
            })?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables only.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config = Config {
            contract_info: env::var("CONTRACT_INFO").unwrap_or_else(|_| default_contract_info()),
            source: NetworkConfig::from_env("SOURCE", "avax")?,
            destination: NetworkConfig::from_env("DESTINATION", "bsc")?,
            scan: ScanConfig {
                window: env_parse("SCAN_WINDOW").unwrap_or_else(default_window),
                gas_limit: env_parse("GAS_LIMIT").unwrap_or_else(default_gas_limit),
                poll_interval_ms: env_parse("POLL_INTERVAL_MS")
                    .unwrap_or_else(default_poll_interval),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// The network bound to a logical role.
    pub fn network(&self, role: Role) -> &NetworkConfig {
        match role {
            Role::Source => &self.source,
            Role::Destination => &self.destination,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_info.is_empty() {
            return Err(ConfigError::Invalid(
                "contract_info path cannot be empty".to_string(),
            ));
        }
        for network in [&self.source, &self.destination] {
            if network.rpc_url.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "rpc_url for chain {} cannot be empty",
                    network.chain
                )));
            }
        }
        if self.source.chain_id == self.destination.chain_id {
            return Err(ConfigError::Invalid(format!(
                "source and destination must be different chains (both have chain id {})",
                self.source.chain_id
            )));
        }
        if self.scan.gas_limit < MIN_GAS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "gas_limit {} is below the minimum of {}",
                self.scan.gas_limit, MIN_GAS_LIMIT
            )));
        }
        Ok(())
    }
}

impl NetworkConfig {
    /// Resolve one role's network from `{PREFIX}_CHAIN`, `{PREFIX}_RPC_URL`,
    /// and `{PREFIX}_CHAIN_ID`, falling back to the built-in chain table.
    /// A chain name outside the table needs both explicit values.
    fn from_env(prefix: &str, default_chain: &str) -> Result<Self, ConfigError> {
        let chain = env::var(format!("{}_CHAIN", prefix))
            .unwrap_or_else(|_| default_chain.to_string());
        let known = known_chain(&chain);

        let rpc_url = match env::var(format!("{}_RPC_URL", prefix)) {
            Ok(url) => url,
            Err(_) => known
                .map(|(url, _)| url.to_string())
                .ok_or_else(|| ConfigError::UnsupportedChain(chain.clone()))?,
        };
        let chain_id = match env::var(format!("{}_CHAIN_ID", prefix))
            .ok()
            .and_then(|v| v.parse().ok())
        {
            Some(id) => id,
            None => known
                .map(|(_, id)| id)
                .ok_or_else(|| ConfigError::UnsupportedChain(chain.clone()))?,
        };

        Ok(NetworkConfig {
            chain,
            rpc_url,
            chain_id,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
