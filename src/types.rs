//! Core relayer types: chain roles, decoded events, and call descriptors.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::contracts::BridgeVault;
use crate::error::ConfigError;

/// The two logical chain roles of the bridge.
///
/// Each role is bound at configuration time to one physical network and a
/// fixed numeric chain id used when constructing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Destination,
}

impl Role {
    /// The counterpart role: relayed calls always land on the opposite chain.
    pub fn opposite(&self) -> Role {
        match self {
            Role::Source => Role::Destination,
            Role::Destination => Role::Source,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Destination => "destination",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Role::Source),
            "destination" => Ok(Role::Destination),
            other => Err(ConfigError::UnknownRole(other.to_string())),
        }
    }
}

/// A bridge event decoded from a receipt log.
///
/// Logs matching neither known signature decode to `Unrecognized`; that is
/// the expected steady-state outcome for most chain activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    /// A user locked an asset on the source chain.
    Deposit {
        token: Address,
        recipient: Address,
        amount: U256,
    },
    /// A user burned a bridged asset on the destination chain.
    Unwrap {
        token: Address,
        recipient: Address,
        amount: U256,
    },
    Unrecognized,
}

impl DecodedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedEvent::Deposit { .. } => "Deposit",
            DecodedEvent::Unwrap { .. } => "Unwrap",
            DecodedEvent::Unrecognized => "Unrecognized",
        }
    }
}

/// The two counterpart-chain entry points the relayer ever calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayFunction {
    Wrap,
    Withdraw,
}

impl RelayFunction {
    pub fn name(&self) -> &'static str {
        match self {
            RelayFunction::Wrap => "wrap",
            RelayFunction::Withdraw => "withdraw",
        }
    }
}

/// A fully-determined outbound call: which chain, which function, and the
/// ordered arguments carried over from the decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    pub target: Role,
    pub function: RelayFunction,
    pub token: Address,
    pub recipient: Address,
    pub amount: U256,
}

impl CallDescriptor {
    /// ABI-encoded calldata for the target contract, argument order
    /// (token, recipient, amount) preserved from the event.
    pub fn calldata(&self) -> Bytes {
        match self.function {
            RelayFunction::Wrap => BridgeVault::wrapCall {
                token: self.token,
                recipient: self.recipient,
                amount: self.amount,
            }
            .abi_encode()
            .into(),
            RelayFunction::Withdraw => BridgeVault::withdrawCall {
                token: self.token,
                recipient: self.recipient,
                amount: self.amount,
            }
            .abi_encode()
            .into(),
        }
    }
}
