//! Registry primitives.
//!
//! Cross-chain bookkeeping consumed by the bridge controller and by the
//! marketplace core: asset registration independent of any bridge
//! transaction, sync snapshots, per-destination message queues, and the
//! lock/unlock primitives. All of it is gated to explicitly authorized
//! caller addresses (plus the admin).

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Storage, Uint128};

use crate::codec::MessageType;
use crate::error::ContractError;
use crate::execute::inbound::complete_request;
use crate::identity::{
    bytes32_to_hex, chain_tag_to_hex, compute_asset_identity, parse_chain_tag, parse_hash32,
    AssetKey,
};
use crate::state::{
    AssetKind, LockRecord, PendingMessage, AUTHORIZED_CALLERS, CONFIG, LOCKS, PENDING_MESSAGES,
    QUEUE_BY_HASH, QUEUE_SEQ, THIS_CHAIN, TOKEN_INDEX,
};

/// Reject callers without the registry-caller role.
fn ensure_authorized(deps: &DepsMut, info: &MessageInfo) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender == config.admin {
        return Ok(());
    }
    let authorized = AUTHORIZED_CALLERS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(false);
    if !authorized {
        return Err(ContractError::UnauthorizedCaller);
    }
    Ok(())
}

// ============================================================================
// RegisterAsset
// ============================================================================

pub fn execute_register_asset(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_contract: String,
    token_or_listing_id: u64,
    origin_chain: Binary,
    target_chain: Binary,
    target_contract: String,
    initial_price: Uint128,
) -> Result<Response, ContractError> {
    ensure_authorized(&deps, &info)?;

    let origin_tag = parse_chain_tag(&origin_chain)?;
    let target_tag = parse_chain_tag(&target_chain)?;

    let identity = compute_asset_identity(
        &origin_tag,
        &origin_contract,
        &AssetKey::Token(token_or_listing_id),
    );
    if LOCKS.may_load(deps.storage, &identity)?.is_some() {
        return Err(ContractError::AssetAlreadyExists);
    }

    let record = LockRecord {
        origin_contract: origin_contract.clone(),
        target_contract,
        origin_chain: origin_tag,
        target_chain: target_tag,
        token_or_listing_id,
        asset_id: None,
        kind: AssetKind::Token,
        last_sync_price: initial_price,
        last_sync_block: env.block.height,
        sync_count: 0,
        active: true,
        verified: false,
        locked: false,
        pending_request: None,
    };
    LOCKS.save(deps.storage, &identity, &record)?;

    let this_chain = THIS_CHAIN.load(deps.storage)?;
    if origin_tag == this_chain {
        TOKEN_INDEX.save(
            deps.storage,
            (origin_contract.as_str(), token_or_listing_id),
            &identity,
        )?;
    }

    Ok(Response::new()
        .add_attribute("action", "register_asset")
        .add_attribute("asset", bytes32_to_hex(&identity))
        .add_attribute("origin_chain", chain_tag_to_hex(&origin_tag))
        .add_attribute("origin_contract", origin_contract)
        .add_attribute("token_or_listing_id", token_or_listing_id.to_string())
        .add_attribute("initial_price", initial_price.to_string()))
}

// ============================================================================
// UpdateSync
// ============================================================================

pub fn execute_update_sync(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    asset: Binary,
    new_price: Uint128,
    target_chain: Binary,
) -> Result<Response, ContractError> {
    ensure_authorized(&deps, &info)?;

    let identity = parse_hash32(&asset)?;
    let target_tag = parse_chain_tag(&target_chain)?;

    let mut record = LOCKS
        .may_load(deps.storage, &identity)?
        .ok_or(ContractError::AssetNotExists)?;

    // Price snapshots are loosely consistent across chains; staleness is
    // expected and tolerated.
    record.sync_count += 1;
    record.last_sync_price = new_price;
    record.last_sync_block = env.block.height;
    record.target_chain = target_tag;
    LOCKS.save(deps.storage, &identity, &record)?;

    Ok(Response::new()
        .add_attribute("action", "update_sync")
        .add_attribute("asset", bytes32_to_hex(&identity))
        .add_attribute("sync_count", record.sync_count.to_string())
        .add_attribute("price", new_price.to_string())
        .add_attribute("target_chain", chain_tag_to_hex(&target_tag)))
}

// ============================================================================
// QueueMessage
// ============================================================================

pub fn execute_queue_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    message_type: MessageType,
    source_chain: Binary,
    target_chain: Binary,
    payload: Binary,
) -> Result<Response, ContractError> {
    ensure_authorized(&deps, &info)?;

    let source_tag = parse_chain_tag(&source_chain)?;
    let target_tag = parse_chain_tag(&target_chain)?;
    let hash = crate::codec::payload_hash(&payload);

    let sequence = append_queue(
        deps.storage,
        &env,
        &target_tag,
        hash,
        message_type.clone(),
        source_tag,
    )?;

    Ok(Response::new()
        .add_attribute("action", "queue_message")
        .add_attribute("message_hash", bytes32_to_hex(&hash))
        .add_attribute("message_type", message_type.as_str())
        .add_attribute("target_chain", chain_tag_to_hex(&target_tag))
        .add_attribute("sequence", sequence.to_string()))
}

// ============================================================================
// LockAsset / UnlockAsset
// ============================================================================

pub fn execute_lock_asset(
    deps: DepsMut,
    info: MessageInfo,
    asset: Binary,
) -> Result<Response, ContractError> {
    ensure_authorized(&deps, &info)?;

    let identity = parse_hash32(&asset)?;
    let mut record = LOCKS
        .may_load(deps.storage, &identity)?
        .ok_or(ContractError::AssetNotExists)?;
    if record.locked {
        return Err(ContractError::AssetAlreadyLocked);
    }
    record.locked = true;
    LOCKS.save(deps.storage, &identity, &record)?;

    Ok(Response::new()
        .add_attribute("action", "lock_asset")
        .add_attribute("asset", bytes32_to_hex(&identity)))
}

pub fn execute_unlock_asset(
    deps: DepsMut,
    info: MessageInfo,
    asset: Binary,
) -> Result<Response, ContractError> {
    ensure_authorized(&deps, &info)?;

    let identity = parse_hash32(&asset)?;
    let mut record = LOCKS
        .may_load(deps.storage, &identity)?
        .ok_or(ContractError::AssetNotExists)?;

    // Unlock requests may arrive more than once; unlocking an unlocked
    // asset is a no-op, not an error.
    if !record.locked {
        return Ok(Response::new()
            .add_attribute("action", "unlock_asset")
            .add_attribute("asset", bytes32_to_hex(&identity))
            .add_attribute("result", "noop"));
    }

    record.locked = false;
    let completed = record.pending_request.take();
    LOCKS.save(deps.storage, &identity, &record)?;
    if let Some(rid) = completed {
        complete_request(deps.storage, &rid)?;
    }

    Ok(Response::new()
        .add_attribute("action", "unlock_asset")
        .add_attribute("asset", bytes32_to_hex(&identity))
        .add_attribute("result", "unlocked"))
}

// ============================================================================
// MarkAssetVerified
// ============================================================================

pub fn execute_mark_asset_verified(
    deps: DepsMut,
    info: MessageInfo,
    asset: Binary,
) -> Result<Response, ContractError> {
    ensure_authorized(&deps, &info)?;

    let identity = parse_hash32(&asset)?;
    let mut record = LOCKS
        .may_load(deps.storage, &identity)?
        .ok_or(ContractError::AssetNotExists)?;
    record.verified = true;
    LOCKS.save(deps.storage, &identity, &record)?;

    Ok(Response::new()
        .add_attribute("action", "mark_asset_verified")
        .add_attribute("asset", bytes32_to_hex(&identity)))
}

// ============================================================================
// Queue Bookkeeping (shared with the controller and inbound processor)
// ============================================================================

/// Append a message to a destination chain's queue; answers its sequence.
pub(crate) fn append_queue(
    storage: &mut dyn Storage,
    env: &Env,
    target_chain: &[u8; 4],
    message_hash: [u8; 32],
    message_type: MessageType,
    source_chain: [u8; 4],
) -> Result<u64, ContractError> {
    let sequence = QUEUE_SEQ
        .may_load(storage, target_chain.as_slice())?
        .unwrap_or(0);
    let entry = PendingMessage {
        message_hash,
        timestamp: env.block.time,
        retry_count: 0,
        message_type,
        source_chain,
        target_chain: *target_chain,
        processed: false,
    };
    PENDING_MESSAGES.save(storage, (target_chain.as_slice(), sequence), &entry)?;
    QUEUE_SEQ.save(storage, target_chain.as_slice(), &(sequence + 1))?;

    let this_chain = THIS_CHAIN.load(storage)?;
    if *target_chain == this_chain {
        QUEUE_BY_HASH.save(storage, &message_hash, &sequence)?;
    }

    Ok(sequence)
}

/// Record an inbound delivery on this chain's own queue. The `processed`
/// flag is monotonic false -> true; `retry_count` counts retry attempts.
pub(crate) fn record_local_delivery(
    storage: &mut dyn Storage,
    env: &Env,
    message_hash: [u8; 32],
    message_type: MessageType,
    source_chain: [u8; 4],
    processed: bool,
    is_retry: bool,
) -> Result<(), ContractError> {
    let this_chain = THIS_CHAIN.load(storage)?;
    let sequence = match QUEUE_BY_HASH.may_load(storage, &message_hash)? {
        Some(sequence) => sequence,
        None => append_queue(
            storage,
            env,
            &this_chain,
            message_hash,
            message_type,
            source_chain,
        )?,
    };

    let key = (this_chain.as_slice(), sequence);
    let mut entry = PENDING_MESSAGES.load(storage, key)?;
    if is_retry {
        entry.retry_count += 1;
    }
    if processed {
        entry.processed = true;
    }
    PENDING_MESSAGES.save(storage, key, &entry)?;

    Ok(())
}
