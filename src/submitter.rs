//! Builds, signs, and submits relay transactions.
//!
//! Gas price and nonce are read from the target chain immediately before
//! each submission; nothing is cached or locally incremented between
//! submissions. Failures are not retried here: a duplicate submission on
//! retry is worse than a dropped relay, which a later scan pass over the
//! same window can reconcile.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::B256;
use alloy::rpc::types::TransactionRequest;
use tracing::debug;

use crate::endpoint::ChainRpc;
use crate::error::SubmissionError;
use crate::registry::ContractBinding;
use crate::types::CallDescriptor;

/// Signs and submits one call descriptor at a time against a target chain.
pub struct TransactionSubmitter {
    /// Conservative fixed gas limit for every outbound call.
    gas_limit: u64,
}

impl TransactionSubmitter {
    pub fn new(gas_limit: u64) -> Self {
        Self { gas_limit }
    }

    /// Submit `descriptor` to `binding.address` on the chain behind
    /// `endpoint`, signing with the binding's warden credential.
    ///
    /// `endpoint` and `binding` must belong to the descriptor's target
    /// chain; the scanner selects them by `descriptor.target`.
    pub async fn submit(
        &self,
        descriptor: &CallDescriptor,
        endpoint: &dyn ChainRpc,
        binding: &ContractBinding,
    ) -> Result<B256, SubmissionError> {
        let gas_price = endpoint
            .gas_price()
            .await
            .map_err(SubmissionError::GasPrice)?;
        // Fresh read, by design: no local nonce cache across submissions.
        let nonce = endpoint
            .transaction_count(binding.operating_address)
            .await
            .map_err(|source| SubmissionError::Nonce {
                address: binding.operating_address,
                source,
            })?;

        let request = TransactionRequest::default()
            .with_from(binding.operating_address)
            .with_to(binding.address)
            .with_nonce(nonce)
            .with_chain_id(endpoint.chain_id())
            .with_gas_limit(self.gas_limit)
            .with_gas_price(gas_price)
            .with_input(descriptor.calldata());

        let wallet = EthereumWallet::from(binding.signer.clone());
        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| SubmissionError::Signing(e.to_string()))?;

        let tx_hash = endpoint
            .send_raw_transaction(&envelope.encoded_2718())
            .await
            .map_err(SubmissionError::Rejected)?;

        debug!(
            function = descriptor.function.name(),
            target = %descriptor.target,
            nonce,
            gas_price,
            tx_hash = %tx_hash,
            "Submitted relay transaction"
        );
        Ok(tx_hash)
    }
}
