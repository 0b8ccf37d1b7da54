//! State definitions for the NovaMarket Bridge contract.
//!
//! Every table is keyed by a derived identity (asset identity, request id,
//! payload hash, or delivery coordinates); records reference each other by
//! key, never by embedded data.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use crate::codec::MessageType;
use crate::error::ContractError;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Transport contract; the only address allowed to deliver messages
    pub transport: Addr,
    /// Marketplace bookkeeping contract on this chain
    pub marketplace: Addr,
    /// Address receiving the platform bridge fee
    pub fee_collector: Addr,
    /// Minimum platform fee on top of the quoted transport fee
    pub min_bridge_fee: Uint128,
    /// Native denom fees are paid in
    pub fee_denom: String,
    /// Whether outbound bridging is currently paused
    pub paused: bool,
}

/// Pending admin change proposal
#[cw_serde]
pub struct PendingAdmin {
    /// Proposed new admin address
    pub new_address: Addr,
    /// Block time when the change can be executed
    pub execute_after: Timestamp,
}

/// Supported chain configuration
#[cw_serde]
pub struct ChainConfig {
    /// Registered 4-byte chain tag
    pub chain_id: [u8; 4],
    /// Human-readable identifier (e.g., "evm_1", "novamarket_hub")
    pub identifier: String,
    /// Bridge endpoint address on that chain (raw bytes)
    pub endpoint: Vec<u8>,
    /// Confirmation depth the transport must observe before delivering
    pub confirmations: u64,
    /// Marketplace fee for sales settled on that chain, in basis points
    pub fee_bps: u32,
    /// Whether this chain is currently enabled
    pub enabled: bool,
}

// ============================================================================
// Asset Bookkeeping
// ============================================================================

/// Kind of bridged asset
#[cw_serde]
pub enum AssetKind {
    Token,
    NonToken,
}

/// Category of a non-token asset, attested by the verification layer
#[cw_serde]
pub enum NonTokenAssetType {
    Domain,
    SocialAccount,
    App,
}

impl NonTokenAssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NonTokenAssetType::Domain => "domain",
            NonTokenAssetType::SocialAccount => "social_account",
            NonTokenAssetType::App => "app",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ContractError> {
        match value {
            "domain" => Ok(NonTokenAssetType::Domain),
            "social_account" => Ok(NonTokenAssetType::SocialAccount),
            "app" => Ok(NonTokenAssetType::App),
            other => Err(ContractError::UnknownAssetType {
                asset_type: other.to_string(),
            }),
        }
    }
}

/// Lock-ledger record of one asset, keyed by its derived identity.
///
/// `locked == true` means the underlying asset is held by the bridge and
/// unusable by its nominal owner on this chain; at most one outstanding lock
/// exists per identity.
#[cw_serde]
pub struct LockRecord {
    /// Contract holding the asset on its origin chain
    pub origin_contract: String,
    /// Contract representing the asset on the target chain
    pub target_contract: String,
    /// Origin chain tag (part of the identity preimage)
    pub origin_chain: [u8; 4],
    /// Most recent bridge target
    pub target_chain: [u8; 4],
    /// Local token or listing id of the asset on this chain
    pub token_or_listing_id: u64,
    /// String asset id for non-token assets
    pub asset_id: Option<String>,
    /// Asset kind
    pub kind: AssetKind,
    /// Price snapshot from the last sync
    pub last_sync_price: Uint128,
    /// Block height of the last sync on this chain
    pub last_sync_block: u64,
    /// Number of syncs observed for this asset
    pub sync_count: u64,
    /// Whether the registration is active
    pub active: bool,
    /// Whether the verification layer has attested this asset
    pub verified: bool,
    /// Whether the asset is currently held by the bridge
    pub locked: bool,
    /// Request id of the outstanding bridge that locked this asset, if any.
    /// Completed and cleared by the unlock that releases the lock.
    pub pending_request: Option<[u8; 32]>,
}

/// Lifecycle of one outbound bridge attempt
#[cw_serde]
pub enum RequestStatus {
    Pending,
    Completed,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
            RequestStatus::Failed => "failed",
        }
    }
}

/// Durable record of one outbound bridge attempt, keyed by request id.
#[cw_serde]
pub struct BridgeRequest {
    /// Owner who initiated the bridge
    pub owner: Addr,
    /// Contract holding the asset on its origin chain
    pub origin_contract: String,
    /// Contract to materialize into on the target chain
    pub target_contract: String,
    /// Local token or listing id at initiation time
    pub token_or_listing_id: u64,
    /// String asset id for non-token assets
    pub asset_id: Option<String>,
    /// Category for non-token assets
    pub asset_type: Option<NonTokenAssetType>,
    /// Whether the bridged asset is a token
    pub is_token: bool,
    /// Total fee attached to the request
    pub fee: Uint128,
    /// Initiation time
    pub timestamp: Timestamp,
    /// Target chain tag
    pub target_chain: [u8; 4],
    /// Request lifecycle state
    pub status: RequestStatus,
}

// ============================================================================
// Message Bookkeeping
// ============================================================================

/// Queue entry for one message, keyed by (destination chain, sequence).
#[cw_serde]
pub struct PendingMessage {
    /// Payload hash (dedup key)
    pub message_hash: [u8; 32],
    /// Queue time on this chain
    pub timestamp: Timestamp,
    /// Number of retry attempts observed for this message
    pub retry_count: u32,
    /// Message kind
    pub message_type: MessageType,
    /// Chain the message originates from
    pub source_chain: [u8; 4],
    /// Chain the message is destined for
    pub target_chain: [u8; 4],
    /// Monotonic false -> true once processing succeeded
    pub processed: bool,
}

/// Bridge statistics
#[cw_serde]
pub struct Stats {
    /// Bridge requests created on this chain
    pub requests_created: u64,
    /// Bridge requests completed by an inbound confirmation
    pub requests_completed: u64,
    /// Inbound messages processed successfully
    pub messages_processed: u64,
    /// Inbound deliveries whose processing failed
    pub messages_failed: u64,
    /// Failed deliveries completed through the retry path
    pub retries_succeeded: u64,
    /// Platform bridge fees collected
    pub fees_collected: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:novamarket-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "0.1.0";

/// 7 days in seconds for admin change timelock
pub const ADMIN_TIMELOCK_DURATION: u64 = 604_800;

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Pending admin proposal (if any)
pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// This chain's registered 4-byte chain tag
pub const THIS_CHAIN: Item<[u8; 4]> = Item::new("this_chain");

/// Bridge statistics
pub const STATS: Item<Stats> = Item::new("stats");

/// Supported chain configuration
/// Key: 4-byte chain tag, Value: ChainConfig
pub const CHAINS: Map<&[u8], ChainConfig> = Map::new("chains");

/// Addresses allowed to invoke the registry primitives
/// Key: caller address, Value: whether active
pub const AUTHORIZED_CALLERS: Map<&Addr, bool> = Map::new("authorized_callers");

/// Lock ledger
/// Key: 32-byte asset identity, Value: LockRecord
pub const LOCKS: Map<&[u8], LockRecord> = Map::new("locks");

/// Local token lookup: (collection contract, token id) -> asset identity
pub const TOKEN_INDEX: Map<(&str, u64), [u8; 32]> = Map::new("token_index");

/// Local non-token lookup: string asset id -> asset identity
pub const NONTOKEN_INDEX: Map<&str, [u8; 32]> = Map::new("nontoken_index");

/// Bridge requests
/// Key: 32-byte request id, Value: BridgeRequest
pub const REQUESTS: Map<&[u8], BridgeRequest> = Map::new("requests");

/// Owner lookup for bridge requests
/// Key: (owner, request id), Value: bool
pub const REQUESTS_BY_OWNER: Map<(&Addr, &[u8]), bool> = Map::new("requests_by_owner");

/// Next queue sequence per destination chain
pub const QUEUE_SEQ: Map<&[u8], u64> = Map::new("queue_seq");

/// Per-destination-chain ordered message queues
/// Key: (4-byte chain tag, sequence), Value: PendingMessage
pub const PENDING_MESSAGES: Map<(&[u8], u64), PendingMessage> = Map::new("pending_messages");

/// Queue position of a message on this chain's own queue, by payload hash
pub const QUEUE_BY_HASH: Map<&[u8], u64> = Map::new("queue_by_hash");

/// Payload hashes whose processing completed; never reprocessed
/// Key: 32-byte payload hash, Value: bool
pub const PROCESSED: Map<&[u8], bool> = Map::new("processed");

/// Failed deliveries awaiting retry
/// Key: (source chain tag, source endpoint, sequence), Value: payload hash
pub const RETRY_STORE: Map<(&[u8], &[u8], u64), [u8; 32]> = Map::new("retry_store");
