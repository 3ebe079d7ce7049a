//! Error taxonomy for the relayer.
//!
//! Configuration problems are fatal and abort a scan before any block is
//! read. Transport, decode, and submission failures are scoped to the block,
//! log, or transaction that triggered them and never halt the scan.

use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Fatal configuration or contract-metadata problems.
///
/// These indicate a deployment/config mismatch, not a transient condition,
/// and are never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown contract role: {0:?} (expected \"source\" or \"destination\")")]
    UnknownRole(String),

    #[error("unsupported chain: {0:?}")]
    UnsupportedChain(String),

    #[error("failed to read contract metadata from {path}: {source}")]
    MetadataUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse contract metadata: {0}")]
    MetadataInvalid(#[from] serde_json::Error),

    #[error("invalid contract address for role {role}: {value:?}")]
    InvalidAddress { role: String, value: String },

    #[error("invalid warden key for role {role}")]
    InvalidKey { role: String },

    #[error("ABI for role {role} does not declare event {event}")]
    MissingEvent { role: String, event: &'static str },

    #[error("{0}")]
    Invalid(String),
}

/// A network-level failure talking to a chain's RPC endpoint.
///
/// Surfaced to the caller, never silently swallowed into a default value.
/// The scanner treats these as localized to the block or transaction being
/// fetched.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("rpc request failed: {0}")]
    Rpc(String),

    #[error("block {0} not found")]
    BlockNotFound(u64),

    #[error("receipt not found for transaction {0}")]
    ReceiptNotFound(B256),
}

/// A log matched a known event signature but its topic/data layout did not
/// decode. Counted per log; never scan-fatal.
///
/// Logs that match neither known signature are not errors at all, they yield
/// [`crate::types::DecodedEvent::Unrecognized`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("event {event}: expected {expected} topics, found {found}")]
    TopicCount {
        event: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("event {event}: log data too short ({len} bytes)")]
    DataTooShort { event: &'static str, len: usize },

    #[error("event {event}: ABI declares no {param} parameter")]
    MissingParam {
        event: &'static str,
        param: &'static str,
    },
}

/// A failure building, signing, or submitting an outbound transaction.
///
/// Logged per log and not retried: a duplicate submission on retry is worse
/// than a dropped relay, which a later scan pass can reconcile.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to read gas price: {0}")]
    GasPrice(#[source] TransportError),

    #[error("failed to read nonce for {address}: {source}")]
    Nonce {
        address: Address,
        #[source]
        source: TransportError,
    },

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    #[error("transaction rejected: {0}")]
    Rejected(#[source] TransportError),
}
