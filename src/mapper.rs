//! The semantic contract of the bridge: decoded event → counterpart call.
//!
//! A Deposit observed on the source chain is reflected as exactly one `wrap`
//! call on the destination chain, and an Unwrap observed on the destination
//! chain as exactly one `withdraw` call on the source chain. No other event
//! shape produces an action.

use crate::types::{CallDescriptor, DecodedEvent, RelayFunction, Role};

/// Pure mapping, no side effects, no I/O. Argument order and values are
/// carried over bit-for-bit.
pub fn map_event(event: &DecodedEvent) -> Option<CallDescriptor> {
    match *event {
        DecodedEvent::Deposit {
            token,
            recipient,
            amount,
        } => Some(CallDescriptor {
            target: Role::Destination,
            function: RelayFunction::Wrap,
            token,
            recipient,
            amount,
        }),
        DecodedEvent::Unwrap {
            token,
            recipient,
            amount,
        } => Some(CallDescriptor {
            target: Role::Source,
            function: RelayFunction::Withdraw,
            token,
            recipient,
            amount,
        }),
        DecodedEvent::Unrecognized => None,
    }
}
