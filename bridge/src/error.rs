//! Error types for the NovaMarket Bridge contract.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: caller is not an authorized registry caller")]
    UnauthorizedCaller,

    #[error("Unauthorized: only the transport endpoint may deliver messages")]
    UnauthorizedTransport,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    #[error("Caller does not hold token {token_id}")]
    NotAssetHolder { token_id: u64 },

    #[error("Caller is not the seller of listing {listing_id}")]
    NotListingSeller { listing_id: u64 },

    // ========================================================================
    // Admin Errors
    // ========================================================================

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Timelock not expired: {remaining_seconds} seconds remaining")]
    TimelockNotExpired { remaining_seconds: u64 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Bridge is paused")]
    BridgePaused,

    #[error("Chain not supported: {chain_tag}")]
    ChainNotSupported { chain_tag: String },

    #[error("Chain already registered: {chain_tag}")]
    ChainAlreadyRegistered { chain_tag: String },

    #[error("Invalid chain tag: expected 4 bytes, got {got}")]
    InvalidChainTag { got: usize },

    #[error("Invalid fee bps: {fee_bps} exceeds 10000")]
    InvalidFeeBps { fee_bps: u32 },

    #[error("Asset type not recognized: {asset_type}")]
    UnknownAssetType { asset_type: String },

    // ========================================================================
    // State Errors
    // ========================================================================

    #[error("Asset is already locked by an outstanding bridge request")]
    AssetAlreadyLocked,

    #[error("Asset already exists")]
    AssetAlreadyExists,

    #[error("Asset does not exist")]
    AssetNotExists,

    #[error("Listing {listing_id} is not active")]
    ListingInactive { listing_id: u64 },

    #[error("Listing {listing_id} has expired")]
    ListingExpired { listing_id: u64 },

    #[error("Listing {listing_id} is not transferable")]
    ListingNotTransferable { listing_id: u64 },

    #[error("Supplied asset id does not match the listed asset id")]
    ListingAssetMismatch,

    // ========================================================================
    // Payment Errors
    // ========================================================================

    #[error("No funds sent")]
    NoFundsSent,

    #[error("Insufficient fee: expected {expected}, got {got}")]
    InsufficientFee { expected: Uint128, got: Uint128 },

    // ========================================================================
    // Delivery Errors
    // ========================================================================

    #[error("Message payload could not be decoded: {reason}")]
    MessageDecodeFailure { reason: String },

    #[error("No failed delivery is stored for these coordinates")]
    NoPendingRetry,

    #[error("Retry payload does not match the stored commitment")]
    RetryPayloadMismatch,

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },
}
