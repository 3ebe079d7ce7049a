//! RPC surface of one chain, and its alloy HTTP implementation.
//!
//! The scanner and submitter only see the [`ChainRpc`] trait, so tests can
//! drive them against an in-memory chain. Every network failure surfaces as
//! a [`TransportError`] for the caller to scope; nothing here falls back to
//! a default value.

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{BlockTransactionsKind, Log};
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;

use crate::config::NetworkConfig;
use crate::error::{ConfigError, TransportError};

/// Read and submit operations the relayer needs from one chain.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// The fixed chain id carried in transactions built for this chain.
    fn chain_id(&self) -> u64;

    async fn latest_block_number(&self) -> Result<u64, TransportError>;

    /// Hashes of the block's transactions, in block order. The block is
    /// fetched with full transaction bodies.
    async fn block_transactions(&self, number: u64) -> Result<Vec<B256>, TransportError>;

    /// The receipt's logs, in receipt order.
    async fn receipt_logs(&self, tx_hash: B256) -> Result<Vec<Log>, TransportError>;

    /// Current transaction count for an address, used as the next nonce.
    async fn transaction_count(&self, address: Address) -> Result<u64, TransportError>;

    async fn gas_price(&self) -> Result<u128, TransportError>;

    /// Submit a signed raw transaction, returning its hash.
    async fn send_raw_transaction(&self, payload: &[u8]) -> Result<B256, TransportError>;
}

/// A [`ChainRpc`] backed by an alloy HTTP provider.
///
/// Both default networks are proof-of-authority chains; alloy decodes their
/// non-standard block headers without extra middleware.
pub struct HttpEndpoint {
    provider: RootProvider<Http<Client>>,
    chain_id: u64,
}

impl HttpEndpoint {
    pub fn connect(network: &NetworkConfig) -> Result<Self, ConfigError> {
        let url = network.rpc_url.parse().map_err(|_| {
            ConfigError::Invalid(format!("invalid RPC URL: {}", network.rpc_url))
        })?;
        Ok(Self {
            provider: ProviderBuilder::new().on_http(url),
            chain_id: network.chain_id,
        })
    }
}

#[async_trait]
impl ChainRpc for HttpEndpoint {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn latest_block_number(&self) -> Result<u64, TransportError> {
        self.provider.get_block_number().await.map_err(rpc_err)
    }

    async fn block_transactions(&self, number: u64) -> Result<Vec<B256>, TransportError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number), BlockTransactionsKind::Full)
            .await
            .map_err(rpc_err)?
            .ok_or(TransportError::BlockNotFound(number))?;
        Ok(block.transactions.hashes().collect())
    }

    async fn receipt_logs(&self, tx_hash: B256) -> Result<Vec<Log>, TransportError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(rpc_err)?
            .ok_or(TransportError::ReceiptNotFound(tx_hash))?;
        Ok(receipt.inner.logs().to_vec())
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, TransportError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(rpc_err)
    }

    async fn gas_price(&self) -> Result<u128, TransportError> {
        self.provider.get_gas_price().await.map_err(rpc_err)
    }

    async fn send_raw_transaction(&self, payload: &[u8]) -> Result<B256, TransportError> {
        let pending = self
            .provider
            .send_raw_transaction(payload)
            .await
            .map_err(rpc_err)?;
        Ok(*pending.tx_hash())
    }
}

fn rpc_err<E: std::fmt::Display>(err: E) -> TransportError {
    TransportError::Rpc(err.to_string())
}
