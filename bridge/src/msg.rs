//! Message types for the NovaMarket Bridge contract.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Transport contract address (the only address allowed to deliver)
    pub transport: String,
    /// Marketplace bookkeeping contract on this chain
    pub marketplace: String,
    /// Address receiving the platform bridge fee
    pub fee_collector: String,
    /// Minimum platform fee on top of the quoted transport fee
    pub min_bridge_fee: Uint128,
    /// Native denom fees are paid in
    pub fee_denom: String,
    /// This chain's predetermined 4-byte chain tag (must not be 0x00000000)
    pub this_chain: Binary,
    /// Initial authorized registry callers
    pub authorized_callers: Vec<String>,
}

// ============================================================================
// Shared Inputs
// ============================================================================

/// Reference to an asset held on this chain.
#[cw_serde]
pub enum AssetRef {
    /// An NFT held by the caller
    Token {
        /// Collection contract holding the token
        contract: String,
        /// Token id within the collection
        token_id: u64,
    },
    /// A marketplace listing for a non-token asset sold by the caller
    Listing {
        /// Listing id in the marketplace contract
        listing_id: u64,
        /// Expected string asset id; must equal the listed one exactly
        asset_id: String,
    },
}

/// Per-kind asset key used for identity derivation queries.
#[cw_serde]
pub enum AssetKeyInput {
    Token { token_id: u64 },
    NonToken { asset_id: String },
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Bridge Controller
    // ========================================================================
    /// Lock an asset on this chain and submit its transfer message to the
    /// transport.
    ///
    /// Authorization: the current token holder / listing seller.
    ///
    /// Attached native funds must cover the quoted transport fee plus the
    /// configured minimum bridge fee; the transport refunds overpayment to
    /// the caller.
    InitiateBridge {
        /// Target chain (4-byte registered chain tag)
        target_chain: Binary,
        /// Contract to materialize into on the target chain
        target_contract: String,
        /// The asset to bridge
        asset: AssetRef,
        /// Transport-specific delivery parameters
        adapter_params: Binary,
    },

    // ========================================================================
    // Inbound Message Processor
    // ========================================================================
    /// Deliver a message payload.
    ///
    /// Authorization: the configured transport contract only.
    ///
    /// Redelivery of an already-processed payload is a no-op. A processing
    /// failure is recorded for retry; the delivery itself never reverts.
    Deliver {
        /// Source chain (4-byte chain tag)
        source_chain: Binary,
        /// Source endpoint address (raw bytes)
        source_endpoint: Binary,
        /// Transport sequence number of this delivery
        sequence: u64,
        /// Opaque payload
        payload: Binary,
    },

    /// Re-run a failed delivery.
    ///
    /// Authorization: anyone. The stored payload-hash commitment is the
    /// authorization; a payload that does not hash to it is rejected.
    RetryMessage {
        /// Source chain (4-byte chain tag)
        source_chain: Binary,
        /// Source endpoint address (raw bytes)
        source_endpoint: Binary,
        /// Transport sequence number of the failed delivery
        sequence: u64,
        /// The original payload
        payload: Binary,
    },

    // ========================================================================
    // Registry
    // ========================================================================
    /// Register an asset independent of any bridge transaction.
    ///
    /// Authorization: authorized registry callers.
    RegisterAsset {
        /// Contract holding the asset on its origin chain
        origin_contract: String,
        /// Token or listing id on the origin chain
        token_or_listing_id: u64,
        /// Origin chain (4-byte chain tag)
        origin_chain: Binary,
        /// Chain the asset is tracked against
        target_chain: Binary,
        /// Contract representing the asset on the target chain
        target_contract: String,
        /// Initial price snapshot
        initial_price: Uint128,
    },

    /// Refresh the price/block sync snapshot of a registered asset.
    ///
    /// Authorization: authorized registry callers.
    UpdateSync {
        /// 32-byte asset identity
        asset: Binary,
        /// New price snapshot
        new_price: Uint128,
        /// Chain the snapshot is synced against
        target_chain: Binary,
    },

    /// Append a message to a destination chain's queue (bookkeeping only;
    /// does not invoke the transport).
    ///
    /// Authorization: authorized registry callers.
    QueueMessage {
        message_type: crate::codec::MessageType,
        /// Source chain (4-byte chain tag)
        source_chain: Binary,
        /// Destination chain (4-byte chain tag)
        target_chain: Binary,
        /// Payload to record
        payload: Binary,
    },

    /// Lock a registered asset.
    ///
    /// Authorization: authorized registry callers.
    LockAsset {
        /// 32-byte asset identity
        asset: Binary,
    },

    /// Unlock a registered asset. Unlocking an unlocked asset is a no-op,
    /// since unlock requests may arrive more than once.
    ///
    /// Authorization: authorized registry callers.
    UnlockAsset {
        /// 32-byte asset identity
        asset: Binary,
    },

    /// Record the verification layer's attestation for an asset.
    ///
    /// Authorization: authorized registry callers.
    MarkAssetVerified {
        /// 32-byte asset identity
        asset: Binary,
    },

    // ========================================================================
    // Chain Management
    // ========================================================================
    /// Register a new chain with a predetermined 4-byte chain tag.
    ///
    /// Authorization: Admin only
    RegisterChain {
        /// Predetermined 4-byte chain tag (must not be 0x00000000)
        chain_id: Binary,
        /// Human-readable identifier (e.g., "evm_1")
        identifier: String,
        /// Bridge endpoint address on that chain (raw bytes)
        endpoint: Binary,
        /// Confirmation depth the transport must observe before delivering
        confirmations: u64,
        /// Marketplace fee for sales settled on that chain, in basis points
        fee_bps: u32,
    },

    /// Update an existing chain's configuration.
    ///
    /// Authorization: Admin only
    UpdateChain {
        /// 4-byte registered chain tag
        chain_id: Binary,
        endpoint: Option<Binary>,
        confirmations: Option<u64>,
        fee_bps: Option<u32>,
        enabled: Option<bool>,
    },

    /// Unregister an existing chain.
    ///
    /// Authorization: Admin only
    UnregisterChain {
        /// 4-byte registered chain tag
        chain_id: Binary,
    },

    // ========================================================================
    // Configuration
    // ========================================================================
    /// Update fee parameters.
    ///
    /// Authorization: Admin only
    UpdateFeeParams {
        min_bridge_fee: Option<Uint128>,
        fee_collector: Option<String>,
    },

    /// Point the bridge at a new transport contract.
    ///
    /// Authorization: Admin only
    SetTransport { address: String },

    /// Point the bridge at a new marketplace contract.
    ///
    /// Authorization: Admin only
    SetMarketplace { address: String },

    /// Grant the registry-caller role.
    ///
    /// Authorization: Admin only
    AddAuthorizedCaller { address: String },

    /// Revoke the registry-caller role.
    ///
    /// Authorization: Admin only
    RemoveAuthorizedCaller { address: String },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Pause outbound bridging and inbound processing.
    ///
    /// Authorization: Admin only
    Pause {},

    /// Resume outbound bridging and inbound processing.
    ///
    /// Authorization: Admin only
    Unpause {},

    /// Propose a new admin (7-day timelock).
    ///
    /// Authorization: Admin only
    ProposeAdmin { new_admin: String },

    /// Accept a pending admin proposal after the timelock.
    ///
    /// Authorization: the proposed admin only
    AcceptAdmin {},

    /// Cancel a pending admin proposal.
    ///
    /// Authorization: Admin only
    CancelAdminProposal {},
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Status summary
    #[returns(StatusResponse)]
    Status {},

    /// Bridge statistics
    #[returns(StatsResponse)]
    Stats {},

    /// One chain's configuration
    #[returns(ChainResponse)]
    Chain { chain_id: Binary },

    /// Paginated chain configurations
    #[returns(ChainsResponse)]
    Chains {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Derive an asset identity (pure computation)
    #[returns(IdentityResponse)]
    AssetIdentity {
        origin_chain: Binary,
        contract_ref: String,
        key: AssetKeyInput,
    },

    /// Lock-ledger record by asset identity
    #[returns(LockRecordResponse)]
    LockRecord { asset: Binary },

    /// Bridge request by request id
    #[returns(RequestResponse)]
    BridgeRequest { request_id: Binary },

    /// Paginated bridge requests of one owner
    #[returns(RequestsResponse)]
    RequestsByOwner {
        owner: String,
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Paginated queue of messages destined for a chain
    #[returns(PendingMessagesResponse)]
    PendingMessages {
        target_chain: Binary,
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    /// Whether a payload hash has been processed
    #[returns(ProcessedResponse)]
    Processed { payload_hash: Binary },

    /// Stored retry commitment for delivery coordinates, if any
    #[returns(RetryEntryResponse)]
    RetryEntry {
        source_chain: Binary,
        source_endpoint: Binary,
        sequence: u64,
    },

    /// Active authorized registry callers
    #[returns(AuthorizedCallersResponse)]
    AuthorizedCallers {},

    /// Pending admin proposal, if any
    #[returns(PendingAdminResponse)]
    PendingAdmin {},
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub transport: Addr,
    pub marketplace: Addr,
    pub fee_collector: Addr,
    pub min_bridge_fee: Uint128,
    pub fee_denom: String,
    pub paused: bool,
    pub this_chain: Binary,
}

#[cw_serde]
pub struct StatusResponse {
    pub paused: bool,
    pub registered_chains: u32,
    pub authorized_callers: u32,
}

#[cw_serde]
pub struct StatsResponse {
    pub requests_created: u64,
    pub requests_completed: u64,
    pub messages_processed: u64,
    pub messages_failed: u64,
    pub retries_succeeded: u64,
    pub fees_collected: Uint128,
}

#[cw_serde]
pub struct ChainResponse {
    pub chain_id: Binary,
    pub identifier: String,
    pub endpoint: Binary,
    pub confirmations: u64,
    pub fee_bps: u32,
    pub enabled: bool,
}

#[cw_serde]
pub struct ChainsResponse {
    pub chains: Vec<ChainResponse>,
}

#[cw_serde]
pub struct IdentityResponse {
    pub asset: Binary,
}

#[cw_serde]
pub struct LockRecordResponse {
    pub asset: Binary,
    pub origin_contract: String,
    pub target_contract: String,
    pub origin_chain: Binary,
    pub target_chain: Binary,
    pub token_or_listing_id: u64,
    pub asset_id: Option<String>,
    pub is_token: bool,
    pub last_sync_price: Uint128,
    pub last_sync_block: u64,
    pub sync_count: u64,
    pub active: bool,
    pub verified: bool,
    pub locked: bool,
    pub pending_request: Option<Binary>,
}

#[cw_serde]
pub struct RequestResponse {
    pub request_id: Binary,
    pub owner: Addr,
    pub origin_contract: String,
    pub target_contract: String,
    pub token_or_listing_id: u64,
    pub asset_id: Option<String>,
    pub asset_type: Option<String>,
    pub is_token: bool,
    pub fee: Uint128,
    pub timestamp: Timestamp,
    pub target_chain: Binary,
    pub status: String,
}

#[cw_serde]
pub struct RequestsResponse {
    pub requests: Vec<RequestResponse>,
}

#[cw_serde]
pub struct PendingMessageEntry {
    pub sequence: u64,
    pub message_hash: Binary,
    pub timestamp: Timestamp,
    pub retry_count: u32,
    pub message_type: crate::codec::MessageType,
    pub source_chain: Binary,
    pub target_chain: Binary,
    pub processed: bool,
}

#[cw_serde]
pub struct PendingMessagesResponse {
    pub messages: Vec<PendingMessageEntry>,
}

#[cw_serde]
pub struct ProcessedResponse {
    pub processed: bool,
}

#[cw_serde]
pub struct RetryEntryResponse {
    pub payload_hash: Option<Binary>,
}

#[cw_serde]
pub struct AuthorizedCallersResponse {
    pub callers: Vec<Addr>,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_admin: Option<Addr>,
    pub execute_after: Option<Timestamp>,
}
