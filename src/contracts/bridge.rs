//! Bridge vault contract interface
//!
//! Uses alloy's sol! macro to generate type-safe call and event bindings.
//! The same interface shape is deployed on both chains: the source vault
//! emits `Deposit` and accepts `withdraw`, the destination vault emits
//! `Unwrap` and accepts `wrap`.

use alloy::sol;

sol! {
    /// Vault interface the relayer observes and calls.
    contract BridgeVault {
        /// Mint the wrapped asset on the destination chain.
        /// Called by the warden after observing a Deposit on the source chain.
        function wrap(address token, address recipient, uint256 amount) external;

        /// Release the locked asset on the source chain.
        /// Called by the warden after observing an Unwrap on the destination chain.
        function withdraw(address token, address recipient, uint256 amount) external;

        /// Emitted on the source chain when a user locks an asset.
        event Deposit(address indexed token, address indexed recipient, uint256 amount);

        /// Emitted on the destination chain when a user burns a wrapped asset.
        event Unwrap(address indexed token, address indexed recipient, uint256 amount);
    }
}
