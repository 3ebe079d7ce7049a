//! Contract interface definitions for the bridged vault contracts.

pub mod bridge;

pub use bridge::BridgeVault;
