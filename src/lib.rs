//! Bridge Warden: a two-way event relayer between a source and a destination
//! EVM chain.
//!
//! The relayer scans a trailing window of recent blocks on one chain, decodes
//! `Deposit` and `Unwrap` events from transaction receipts, and mirrors each
//! one as exactly one signed call on the counterpart chain:
//!
//! - `Deposit` observed on the source chain → `wrap` on the destination chain
//! - `Unwrap` observed on the destination chain → `withdraw` on the source chain
//!
//! Modules:
//!
//! - **config** - environment-driven configuration and the chain table
//! - **registry** - contract metadata loading and per-role binding resolution
//! - **endpoint** - the `ChainRpc` trait and its alloy HTTP implementation
//! - **decoder** - signature-hash event decoding against the loaded ABI
//! - **mapper** - the pure event → counterpart-call mapping
//! - **submitter** - nonce/gas acquisition, signing, raw submission
//! - **scanner** - the block-window scan loop and per-log fault isolation

pub mod config;
pub mod contracts;
pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod mapper;
pub mod registry;
pub mod scanner;
pub mod submitter;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
