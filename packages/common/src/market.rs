//! Marketplace bookkeeping and wrapped-collection interfaces.
//!
//! The listing/auction engine and the wrapped asset collections are external
//! collaborators. The bridge only flips listing activity while an asset is
//! locked, creates bridged listings on first arrival, and mints into wrapped
//! collections.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Timestamp, Uint128};

/// Execute interface of the marketplace contract (the subset the bridge
/// invokes).
#[cw_serde]
pub enum MarketExecuteMsg {
    /// Activate or deactivate a listing.
    ///
    /// The bridge deactivates a listing when its asset is locked for
    /// bridging and reactivates it when the asset is unlocked.
    SetListingActive { listing_id: u64, active: bool },

    /// Create a listing for a non-token asset that arrived over the bridge.
    CreateBridgedListing {
        seller: String,
        asset_id: String,
        asset_type: String,
        price: Uint128,
    },
}

/// Query interface of the marketplace contract.
#[cw_serde]
pub enum MarketQueryMsg {
    /// Look up a listing by id.
    Listing { listing_id: u64 },
}

/// Response to [`MarketQueryMsg::Listing`].
#[cw_serde]
pub struct ListingResponse {
    /// Registered seller of the listing
    pub seller: String,
    /// Whether the listing is currently active
    pub active: bool,
    /// Whether the listed asset may be transferred cross-chain
    pub transferable: bool,
    /// Listing expiry time
    pub expires_at: Timestamp,
    /// Asset identifier attested by the verification layer
    pub asset_id: String,
    /// Asset category ("domain", "social_account", "app")
    pub asset_type: String,
    /// Current listing price in native currency
    pub price: Uint128,
}

/// Execute interface of a wrapped asset collection.
#[cw_serde]
pub enum CollectionExecuteMsg {
    /// Mint the wrapped representation of a bridged token.
    Mint { token_id: String, owner: String },
}
