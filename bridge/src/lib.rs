//! NovaMarket Bridge Contract - Cross-Chain Asset Synchronization
//!
//! One instance of this contract runs on every supported chain. It locks
//! marketplace assets (NFTs and externally-verified non-token assets) on
//! their origin chain, submits a transfer message to an external transport,
//! and deterministically unlocks or materializes the corresponding
//! representation where the message arrives.
//!
//! # Outgoing Flow (Lock)
//! 1. The holder/seller calls `InitiateBridge` with the transport fee attached
//! 2. The asset is locked (token custody moves to the bridge; a listing is
//!    deactivated) and a `Pending` request is recorded
//! 3. The encoded message is submitted to the transport
//!
//! # Incoming Flow (Deliver)
//! 1. The transport invokes `Deliver` with the payload
//! 2. Payloads are deduplicated by hash; duplicates are no-ops
//! 3. A locked asset re-entering a chain is unlocked and returned to its
//!    owner; a first arrival is materialized through the wrapped collection
//!    or marketplace
//! 4. A processing failure is stored for retry instead of rejecting the
//!    delivery; `RetryMessage` with the identical payload completes it
//!
//! # Guarantees
//! - Exactly-once processing on top of at-least-once delivery
//! - At most one outstanding lock per asset identity
//! - State is committed before any external call is dispatched

pub mod codec;
pub mod contract;
pub mod error;
mod execute;
pub mod identity;
pub mod msg;
mod query;
pub mod state;

pub use crate::codec::{BridgeMessage, MessageType};
pub use crate::error::ContractError;
pub use crate::identity::{compute_asset_identity, keccak256};
