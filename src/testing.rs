//! Test fixtures: an in-memory chain behind [`ChainRpc`], contract metadata,
//! and receipt-log builders.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, keccak256, Address, Bytes, LogData, TxKind, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use async_trait::async_trait;

use crate::contracts::BridgeVault;
use crate::endpoint::ChainRpc;
use crate::error::TransportError;
use crate::registry::{ContractBinding, ContractRegistry};
use crate::types::Role;

pub const TOKEN: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const USER: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

/// Contract metadata fixture. The warden key is the first well-known anvil
/// development key; both roles share it, as the reference deployment does.
pub const CONTRACT_INFO_JSON: &str = r#"{
  "source": {
    "address": "0x1000000000000000000000000000000000000001",
    "abi": [
      {"type": "event", "name": "Deposit", "anonymous": false, "inputs": [
        {"name": "token", "type": "address", "indexed": true},
        {"name": "recipient", "type": "address", "indexed": true},
        {"name": "amount", "type": "uint256", "indexed": false}
      ]},
      {"type": "event", "name": "Unwrap", "anonymous": false, "inputs": [
        {"name": "token", "type": "address", "indexed": true},
        {"name": "recipient", "type": "address", "indexed": true},
        {"name": "amount", "type": "uint256", "indexed": false}
      ]},
      {"type": "function", "name": "withdraw", "stateMutability": "nonpayable", "inputs": [
        {"name": "token", "type": "address"},
        {"name": "recipient", "type": "address"},
        {"name": "amount", "type": "uint256"}
      ], "outputs": []}
    ],
    "warden_key": "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
  },
  "destination": {
    "address": "0x2000000000000000000000000000000000000002",
    "abi": [
      {"type": "event", "name": "Deposit", "anonymous": false, "inputs": [
        {"name": "token", "type": "address", "indexed": true},
        {"name": "recipient", "type": "address", "indexed": true},
        {"name": "amount", "type": "uint256", "indexed": false}
      ]},
      {"type": "event", "name": "Unwrap", "anonymous": false, "inputs": [
        {"name": "token", "type": "address", "indexed": true},
        {"name": "recipient", "type": "address", "indexed": true},
        {"name": "amount", "type": "uint256", "indexed": false}
      ]},
      {"type": "function", "name": "wrap", "stateMutability": "nonpayable", "inputs": [
        {"name": "token", "type": "address"},
        {"name": "recipient", "type": "address"},
        {"name": "amount", "type": "uint256"}
      ], "outputs": []}
    ],
    "warden_key": "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
  }
}"#;

pub fn registry() -> ContractRegistry {
    ContractRegistry::from_json(CONTRACT_INFO_JSON).expect("fixture metadata parses")
}

pub fn source_binding() -> ContractBinding {
    registry().resolve(Role::Source).expect("source resolves")
}

pub fn destination_binding() -> ContractBinding {
    registry()
        .resolve(Role::Destination)
        .expect("destination resolves")
}

/// Deterministic transaction hash for block fixtures.
pub fn tx_hash(n: u64) -> B256 {
    keccak256(n.to_be_bytes())
}

fn event_log(topic0: B256, token: Address, recipient: Address, amount: U256) -> Log {
    let topics = vec![topic0, token.into_word(), recipient.into_word()];
    let data = Bytes::from(amount.to_be_bytes::<32>().to_vec());
    Log {
        inner: alloy::primitives::Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(topics, data),
        },
        ..Default::default()
    }
}

pub fn deposit_log(token: Address, recipient: Address, amount: U256) -> Log {
    event_log(BridgeVault::Deposit::SIGNATURE_HASH, token, recipient, amount)
}

pub fn unwrap_log(token: Address, recipient: Address, amount: U256) -> Log {
    event_log(BridgeVault::Unwrap::SIGNATURE_HASH, token, recipient, amount)
}

/// An ERC-20 Transfer, the classic unrelated event the scanner must skip.
pub fn unrecognized_log() -> Log {
    event_log(
        keccak256(b"Transfer(address,address,uint256)"),
        TOKEN,
        USER,
        U256::from(7u64),
    )
}

#[derive(Default)]
struct MockState {
    latest_block: u64,
    fail_latest: bool,
    blocks: HashMap<u64, Vec<B256>>,
    failing_blocks: HashSet<u64>,
    receipts: HashMap<B256, Vec<Log>>,
    nonce: u64,
    gas_price: u128,
    submissions: Vec<Vec<u8>>,
    reject_submissions: u32,
}

/// In-memory [`ChainRpc`] with injectable faults and a submission record.
pub struct MockChain {
    chain_id: u64,
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            state: Mutex::new(MockState {
                gas_price: 1_000_000_000,
                ..Default::default()
            }),
        }
    }

    pub fn set_latest_block(&self, number: u64) {
        self.state.lock().unwrap().latest_block = number;
    }

    pub fn add_block(&self, number: u64, transactions: Vec<B256>) {
        self.state.lock().unwrap().blocks.insert(number, transactions);
    }

    /// Make every fetch of this block fail with a transport error.
    pub fn fail_block(&self, number: u64) {
        self.state.lock().unwrap().failing_blocks.insert(number);
    }

    /// Let a previously failing block fetch succeed again.
    pub fn clear_block_fault(&self, number: u64) {
        self.state.lock().unwrap().failing_blocks.remove(&number);
    }

    /// Make tip reads fail with a transport error.
    pub fn fail_latest_block(&self) {
        self.state.lock().unwrap().fail_latest = true;
    }

    pub fn add_receipt(&self, tx: B256, logs: Vec<Log>) {
        self.state.lock().unwrap().receipts.insert(tx, logs);
    }

    pub fn set_nonce(&self, nonce: u64) {
        self.state.lock().unwrap().nonce = nonce;
    }

    pub fn set_gas_price(&self, gas_price: u128) {
        self.state.lock().unwrap().gas_price = gas_price;
    }

    /// Reject the next `n` raw-transaction submissions.
    pub fn reject_next_submissions(&self, n: u32) {
        self.state.lock().unwrap().reject_submissions = n;
    }

    /// Accepted submissions, decoded, in submission order.
    pub fn submitted_calls(&self) -> Vec<SubmittedTx> {
        self.state
            .lock()
            .unwrap()
            .submissions
            .iter()
            .map(|raw| decode_submission(raw))
            .collect()
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn latest_block_number(&self) -> Result<u64, TransportError> {
        let state = self.state.lock().unwrap();
        if state.fail_latest {
            return Err(TransportError::Rpc("injected tip fault".to_string()));
        }
        Ok(state.latest_block)
    }

    async fn block_transactions(&self, number: u64) -> Result<Vec<B256>, TransportError> {
        let state = self.state.lock().unwrap();
        if state.failing_blocks.contains(&number) {
            return Err(TransportError::Rpc("injected block fault".to_string()));
        }
        Ok(state.blocks.get(&number).cloned().unwrap_or_default())
    }

    async fn receipt_logs(&self, tx_hash: B256) -> Result<Vec<Log>, TransportError> {
        let state = self.state.lock().unwrap();
        state
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or(TransportError::ReceiptNotFound(tx_hash))
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, TransportError> {
        Ok(self.state.lock().unwrap().nonce)
    }

    async fn gas_price(&self) -> Result<u128, TransportError> {
        Ok(self.state.lock().unwrap().gas_price)
    }

    async fn send_raw_transaction(&self, payload: &[u8]) -> Result<B256, TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_submissions > 0 {
            state.reject_submissions -= 1;
            return Err(TransportError::Rpc(
                "insufficient funds for gas * price + value".to_string(),
            ));
        }
        state.submissions.push(payload.to_vec());
        Ok(keccak256(payload))
    }
}

/// The signed fields of a captured legacy transaction.
pub struct SubmittedTx {
    pub nonce: u64,
    pub chain_id: Option<u64>,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: TxKind,
    pub value: U256,
    pub input: Bytes,
}

pub fn decode_submission(raw: &[u8]) -> SubmittedTx {
    let envelope = TxEnvelope::decode_2718(&mut &raw[..]).expect("valid raw transaction");
    match envelope {
        TxEnvelope::Legacy(signed) => {
            let tx = signed.tx();
            SubmittedTx {
                nonce: tx.nonce,
                chain_id: tx.chain_id,
                gas_price: tx.gas_price,
                gas_limit: tx.gas_limit,
                to: tx.to,
                value: tx.value,
                input: tx.input.clone(),
            }
        }
        other => panic!("expected a legacy transaction, got {:?}", other),
    }
}
