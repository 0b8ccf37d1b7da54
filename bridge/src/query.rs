//! Query handlers for the NovaMarket Bridge contract.

use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::identity::{compute_asset_identity, AssetKey};
use crate::msg::{
    AssetKeyInput, AuthorizedCallersResponse, ChainResponse, ChainsResponse, ConfigResponse,
    IdentityResponse, LockRecordResponse, PendingAdminResponse, PendingMessageEntry,
    PendingMessagesResponse, ProcessedResponse, RequestResponse, RequestsResponse,
    RetryEntryResponse, StatsResponse, StatusResponse,
};
use crate::state::{
    AssetKind, BridgeRequest, AUTHORIZED_CALLERS, CHAINS, CONFIG, LOCKS, PENDING_ADMIN,
    PENDING_MESSAGES, PROCESSED, REQUESTS, REQUESTS_BY_OWNER, RETRY_STORE, STATS, THIS_CHAIN,
};

/// Parse a 4-byte chain tag in query context.
fn chain_tag(value: &Binary) -> StdResult<[u8; 4]> {
    value
        .to_vec()
        .try_into()
        .map_err(|_| StdError::generic_err("chain tag must be 4 bytes"))
}

/// Parse a 32-byte hash in query context.
fn hash32(value: &Binary) -> StdResult<[u8; 32]> {
    value
        .to_vec()
        .try_into()
        .map_err(|_| StdError::generic_err("hash must be 32 bytes"))
}

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    let this_chain = THIS_CHAIN.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        transport: config.transport,
        marketplace: config.marketplace,
        fee_collector: config.fee_collector,
        min_bridge_fee: config.min_bridge_fee,
        fee_denom: config.fee_denom,
        paused: config.paused,
        this_chain: Binary::from(this_chain.to_vec()),
    })
}

pub fn query_status(deps: Deps) -> StdResult<StatusResponse> {
    let config = CONFIG.load(deps.storage)?;

    let chains = CHAINS
        .keys(deps.storage, None, None, Order::Ascending)
        .count();
    let callers = AUTHORIZED_CALLERS
        .keys(deps.storage, None, None, Order::Ascending)
        .count();

    Ok(StatusResponse {
        paused: config.paused,
        registered_chains: chains as u32,
        authorized_callers: callers as u32,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        requests_created: stats.requests_created,
        requests_completed: stats.requests_completed,
        messages_processed: stats.messages_processed,
        messages_failed: stats.messages_failed,
        retries_succeeded: stats.retries_succeeded,
        fees_collected: stats.fees_collected,
    })
}

// ============================================================================
// Chain Queries
// ============================================================================

pub fn query_chain(deps: Deps, chain_id: Binary) -> StdResult<ChainResponse> {
    let tag = chain_tag(&chain_id)?;
    let chain = CHAINS.load(deps.storage, &tag)?;
    Ok(ChainResponse {
        chain_id: Binary::from(chain.chain_id.to_vec()),
        identifier: chain.identifier,
        endpoint: Binary::from(chain.endpoint),
        confirmations: chain.confirmations,
        fee_bps: chain.fee_bps,
        enabled: chain.enabled,
    })
}

pub fn query_chains(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<ChainsResponse> {
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start: Option<Bound<&[u8]>> = start_after
        .as_ref()
        .map(|id| Bound::exclusive(id.as_slice()));

    let chains: Vec<ChainResponse> = CHAINS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, chain) = item?;
            Ok(ChainResponse {
                chain_id: Binary::from(chain.chain_id.to_vec()),
                identifier: chain.identifier,
                endpoint: Binary::from(chain.endpoint),
                confirmations: chain.confirmations,
                fee_bps: chain.fee_bps,
                enabled: chain.enabled,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ChainsResponse { chains })
}

// ============================================================================
// Asset Queries
// ============================================================================

pub fn query_asset_identity(
    origin_chain: Binary,
    contract_ref: String,
    key: AssetKeyInput,
) -> StdResult<IdentityResponse> {
    let tag = chain_tag(&origin_chain)?;
    let identity = match &key {
        AssetKeyInput::Token { token_id } => {
            compute_asset_identity(&tag, &contract_ref, &AssetKey::Token(*token_id))
        }
        AssetKeyInput::NonToken { asset_id } => {
            compute_asset_identity(&tag, &contract_ref, &AssetKey::NonToken(asset_id))
        }
    };
    Ok(IdentityResponse {
        asset: Binary::from(identity.to_vec()),
    })
}

pub fn query_lock_record(deps: Deps, asset: Binary) -> StdResult<LockRecordResponse> {
    let identity = hash32(&asset)?;
    let record = LOCKS.load(deps.storage, &identity)?;
    Ok(LockRecordResponse {
        asset,
        origin_contract: record.origin_contract,
        target_contract: record.target_contract,
        origin_chain: Binary::from(record.origin_chain.to_vec()),
        target_chain: Binary::from(record.target_chain.to_vec()),
        token_or_listing_id: record.token_or_listing_id,
        asset_id: record.asset_id,
        is_token: matches!(record.kind, AssetKind::Token),
        last_sync_price: record.last_sync_price,
        last_sync_block: record.last_sync_block,
        sync_count: record.sync_count,
        active: record.active,
        verified: record.verified,
        locked: record.locked,
        pending_request: record
            .pending_request
            .map(|rid| Binary::from(rid.to_vec())),
    })
}

// ============================================================================
// Request Queries
// ============================================================================

fn request_response(request_id: Binary, request: BridgeRequest) -> RequestResponse {
    RequestResponse {
        request_id,
        owner: request.owner,
        origin_contract: request.origin_contract,
        target_contract: request.target_contract,
        token_or_listing_id: request.token_or_listing_id,
        asset_id: request.asset_id,
        asset_type: request.asset_type.map(|t| t.as_str().to_string()),
        is_token: request.is_token,
        fee: request.fee,
        timestamp: request.timestamp,
        target_chain: Binary::from(request.target_chain.to_vec()),
        status: request.status.as_str().to_string(),
    }
}

pub fn query_bridge_request(deps: Deps, request_id: Binary) -> StdResult<RequestResponse> {
    let id = hash32(&request_id)?;
    let request = REQUESTS.load(deps.storage, &id)?;
    Ok(request_response(request_id, request))
}

pub fn query_requests_by_owner(
    deps: Deps,
    owner: String,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<RequestsResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start: Option<Bound<&[u8]>> = start_after
        .as_ref()
        .map(|id| Bound::exclusive(id.as_slice()));

    let requests: Vec<RequestResponse> = REQUESTS_BY_OWNER
        .prefix(&owner)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|key| {
            let id = key?;
            let request = REQUESTS.load(deps.storage, &id)?;
            Ok(request_response(Binary::from(id), request))
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(RequestsResponse { requests })
}

// ============================================================================
// Message Queries
// ============================================================================

pub fn query_pending_messages(
    deps: Deps,
    target_chain: Binary,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<PendingMessagesResponse> {
    let tag = chain_tag(&target_chain)?;
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start = start_after.map(Bound::exclusive);

    let messages: Vec<PendingMessageEntry> = PENDING_MESSAGES
        .prefix(&tag)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (sequence, entry) = item?;
            Ok(PendingMessageEntry {
                sequence,
                message_hash: Binary::from(entry.message_hash.to_vec()),
                timestamp: entry.timestamp,
                retry_count: entry.retry_count,
                message_type: entry.message_type,
                source_chain: Binary::from(entry.source_chain.to_vec()),
                target_chain: Binary::from(entry.target_chain.to_vec()),
                processed: entry.processed,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(PendingMessagesResponse { messages })
}

pub fn query_processed(deps: Deps, payload_hash: Binary) -> StdResult<ProcessedResponse> {
    let hash = hash32(&payload_hash)?;
    let processed = PROCESSED
        .may_load(deps.storage, &hash)?
        .unwrap_or(false);
    Ok(ProcessedResponse { processed })
}

pub fn query_retry_entry(
    deps: Deps,
    source_chain: Binary,
    source_endpoint: Binary,
    sequence: u64,
) -> StdResult<RetryEntryResponse> {
    let tag = chain_tag(&source_chain)?;
    let stored = RETRY_STORE.may_load(
        deps.storage,
        (tag.as_slice(), source_endpoint.as_slice(), sequence),
    )?;
    Ok(RetryEntryResponse {
        payload_hash: stored.map(|hash| Binary::from(hash.to_vec())),
    })
}

// ============================================================================
// Administration Queries
// ============================================================================

pub fn query_authorized_callers(deps: Deps) -> StdResult<AuthorizedCallersResponse> {
    let callers = AUTHORIZED_CALLERS
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;
    Ok(AuthorizedCallersResponse { callers })
}

pub fn query_pending_admin(deps: Deps) -> StdResult<PendingAdminResponse> {
    let pending = PENDING_ADMIN.may_load(deps.storage)?;
    Ok(PendingAdminResponse {
        new_admin: pending.as_ref().map(|p| p.new_address.clone()),
        execute_after: pending.map(|p| p.execute_after),
    })
}
