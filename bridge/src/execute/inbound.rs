//! Inbound Message Processor.
//!
//! `Deliver` is the single callback the transport invokes, once per
//! delivered message per endpoint, with at-least-once semantics and no
//! ordering guarantee. Processing is made exactly-once on top of that:
//! payloads are deduplicated by keccak256 hash, and a processing failure is
//! converted into a durable retry entry instead of reverting the delivery.
//!
//! `RetryMessage` is permissionless: the stored payload-hash commitment is
//! the authorization. It is the only path by which a once-failed message can
//! complete.
//!
//! Handlers validate before they mutate, so a dispatch error implies no
//! handler state was written when the failure is recorded.

use cosmwasm_std::{
    attr, to_json_binary, Attribute, Binary, CosmosMsg, DepsMut, Env, MessageInfo, Response,
    Storage, Uint128, WasmMsg,
};

use common::{CollectionExecuteMsg, MarketExecuteMsg};

use crate::codec::{decode_message, payload_hash, BridgeMessage, MessageType};
use crate::error::ContractError;
use crate::execute::registry::record_local_delivery;
use crate::identity::{
    bytes32_to_hex, chain_tag_to_hex, compute_asset_identity, parse_chain_tag, AssetKey,
};
use crate::state::{
    AssetKind, LockRecord, RequestStatus, CONFIG, LOCKS, NONTOKEN_INDEX, PROCESSED, REQUESTS,
    RETRY_STORE, STATS, THIS_CHAIN, TOKEN_INDEX,
};

/// What a successful dispatch produced.
struct DispatchOutcome {
    messages: Vec<CosmosMsg>,
    attributes: Vec<Attribute>,
    message_type: MessageType,
}

// ============================================================================
// Deliver - Transport only
// ============================================================================

pub fn execute_deliver(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain: Binary,
    source_endpoint: Binary,
    sequence: u64,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.transport {
        return Err(ContractError::UnauthorizedTransport);
    }

    let src_tag = parse_chain_tag(&source_chain)?;
    let hash = payload_hash(&payload);

    // Idempotent redelivery: already-processed payloads are a pure no-op
    if PROCESSED.may_load(deps.storage, &hash)?.unwrap_or(false) {
        return Ok(Response::new()
            .add_attribute("action", "deliver")
            .add_attribute("result", "duplicate")
            .add_attribute("payload_hash", bytes32_to_hex(&hash)));
    }

    match dispatch(deps.branch(), &env, &payload) {
        Ok(outcome) => {
            PROCESSED.save(deps.storage, &hash, &true)?;
            record_local_delivery(
                deps.storage,
                &env,
                hash,
                outcome.message_type,
                src_tag,
                true,
                false,
            )?;

            let mut stats = STATS.load(deps.storage)?;
            stats.messages_processed += 1;
            STATS.save(deps.storage, &stats)?;

            Ok(Response::new()
                .add_messages(outcome.messages)
                .add_attribute("action", "deliver")
                .add_attribute("result", "processed")
                .add_attribute("payload_hash", bytes32_to_hex(&hash))
                .add_attribute("source_chain", chain_tag_to_hex(&src_tag))
                .add_attribute("sequence", sequence.to_string())
                .add_attributes(outcome.attributes))
        }
        Err(err) => {
            // The delivery happened; only the processing failed. Persist the
            // retry commitment and report success to the transport so the
            // message is not discarded.
            RETRY_STORE.save(
                deps.storage,
                (src_tag.as_slice(), source_endpoint.as_slice(), sequence),
                &hash,
            )?;
            if let Ok(message) = decode_message(&payload) {
                fail_tracked_request(deps.storage, &message)?;
                record_local_delivery(
                    deps.storage,
                    &env,
                    hash,
                    message.message_type(),
                    src_tag,
                    false,
                    false,
                )?;
            }

            let mut stats = STATS.load(deps.storage)?;
            stats.messages_failed += 1;
            STATS.save(deps.storage, &stats)?;

            Ok(Response::new()
                .add_attribute("action", "deliver")
                .add_attribute("result", "failed")
                .add_attribute("payload_hash", bytes32_to_hex(&hash))
                .add_attribute("source_chain", chain_tag_to_hex(&src_tag))
                .add_attribute("sequence", sequence.to_string())
                .add_attribute("reason", err.to_string()))
        }
    }
}

// ============================================================================
// RetryMessage - Anyone
// ============================================================================

pub fn execute_retry_message(
    mut deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    source_chain: Binary,
    source_endpoint: Binary,
    sequence: u64,
    payload: Binary,
) -> Result<Response, ContractError> {
    let src_tag = parse_chain_tag(&source_chain)?;
    let key = (src_tag.as_slice(), source_endpoint.as_slice(), sequence);

    let stored = RETRY_STORE
        .may_load(deps.storage, key)?
        .ok_or(ContractError::NoPendingRetry)?;
    let hash = payload_hash(&payload);
    if hash != stored {
        return Err(ContractError::RetryPayloadMismatch);
    }

    // The payload may have been processed through a later fresh delivery;
    // absorb the replay and clear the stale entry.
    if PROCESSED.may_load(deps.storage, &hash)?.unwrap_or(false) {
        RETRY_STORE.remove(deps.storage, key);
        return Ok(Response::new()
            .add_attribute("action", "retry_message")
            .add_attribute("result", "duplicate")
            .add_attribute("payload_hash", bytes32_to_hex(&hash)));
    }

    // A handler failure here surfaces as an error: everything rolls back and
    // the stored entry survives for the next attempt.
    let outcome = dispatch(deps.branch(), &env, &payload)?;

    RETRY_STORE.remove(deps.storage, key);
    PROCESSED.save(deps.storage, &hash, &true)?;
    record_local_delivery(
        deps.storage,
        &env,
        hash,
        outcome.message_type,
        src_tag,
        true,
        true,
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.messages_processed += 1;
    stats.retries_succeeded += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_messages(outcome.messages)
        .add_attribute("action", "retry_message")
        .add_attribute("result", "processed")
        .add_attribute("payload_hash", bytes32_to_hex(&hash))
        .add_attribute("source_chain", chain_tag_to_hex(&src_tag))
        .add_attribute("sequence", sequence.to_string())
        .add_attributes(outcome.attributes))
}

// ============================================================================
// Dispatch
// ============================================================================

/// Decode a payload and route it to its handler. The message tag is matched
/// exhaustively here and nowhere else.
fn dispatch(deps: DepsMut, env: &Env, payload: &Binary) -> Result<DispatchOutcome, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    match decode_message(payload)? {
        BridgeMessage::AssetTransfer {
            request_id,
            owner,
            origin_chain,
            origin_contract,
            token_id,
            target_contract,
            ..
        } => handle_asset_transfer(
            deps,
            env,
            &request_id,
            &owner,
            &origin_chain,
            &origin_contract,
            token_id,
            &target_contract,
        ),
        BridgeMessage::NonTokenTransfer {
            request_id,
            owner,
            origin_chain,
            origin_contract,
            listing_id,
            asset_id,
            asset_type,
            target_contract,
            price,
            ..
        } => handle_non_token_transfer(
            deps,
            env,
            &request_id,
            &owner,
            &origin_chain,
            &origin_contract,
            listing_id,
            &asset_id,
            &asset_type,
            &target_contract,
            price,
        ),
    }
}

// ============================================================================
// Handler: AssetTransfer
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn handle_asset_transfer(
    deps: DepsMut,
    env: &Env,
    request_id: &Binary,
    owner: &str,
    origin_chain: &Binary,
    origin_contract: &str,
    token_id: u64,
    target_contract: &str,
) -> Result<DispatchOutcome, ContractError> {
    let origin_tag = parse_chain_tag(origin_chain)?;
    let identity =
        compute_asset_identity(&origin_tag, origin_contract, &AssetKey::Token(token_id));
    let this_chain = THIS_CHAIN.load(deps.storage)?;

    match LOCKS.may_load(deps.storage, &identity)? {
        Some(record) if record.locked => {
            // The asset is re-entering a chain where the bridge holds it:
            // clear the lock and hand custody back to the owner.
            let owner_addr = deps.api.addr_validate(owner)?;
            let holder = if record.origin_chain == this_chain {
                record.origin_contract.clone()
            } else {
                record.target_contract.clone()
            };

            let mut record = record;
            record.locked = false;
            let completed = record.pending_request.take();
            LOCKS.save(deps.storage, &identity, &record)?;
            if let Some(rid) = completed {
                complete_request(deps.storage, &rid)?;
            }

            let release = CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: holder,
                msg: to_json_binary(&cw721::Cw721ExecuteMsg::TransferNft {
                    recipient: owner_addr.to_string(),
                    token_id: record.token_or_listing_id.to_string(),
                })?,
                funds: vec![],
            });

            Ok(DispatchOutcome {
                messages: vec![release],
                attributes: vec![
                    attr("handler", "asset_unlocked"),
                    attr("asset", bytes32_to_hex(&identity)),
                    attr("request_id", bytes32_to_hex_binary(request_id)),
                    attr("owner", owner_addr),
                ],
                message_type: MessageType::AssetTransfer,
            })
        }
        Some(_) => {
            // Already live and unlocked on this chain; materializing again
            // would fork the asset.
            Err(ContractError::AssetAlreadyExists)
        }
        None => {
            // First arrival on this chain: note the asset and have the
            // wrapped collection materialize it.
            let owner_addr = deps.api.addr_validate(owner)?;
            let collection = deps.api.addr_validate(target_contract)?;

            let record = LockRecord {
                origin_contract: origin_contract.to_string(),
                target_contract: collection.to_string(),
                origin_chain: origin_tag,
                target_chain: this_chain,
                token_or_listing_id: token_id,
                asset_id: None,
                kind: AssetKind::Token,
                last_sync_price: Uint128::zero(),
                last_sync_block: env.block.height,
                sync_count: 0,
                active: true,
                verified: false,
                locked: false,
                pending_request: None,
            };
            LOCKS.save(deps.storage, &identity, &record)?;
            TOKEN_INDEX.save(deps.storage, (collection.as_str(), token_id), &identity)?;

            let mint = CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: collection.to_string(),
                msg: to_json_binary(&CollectionExecuteMsg::Mint {
                    token_id: token_id.to_string(),
                    owner: owner_addr.to_string(),
                })?,
                funds: vec![],
            });

            Ok(DispatchOutcome {
                messages: vec![mint],
                attributes: vec![
                    attr("handler", "asset_arrived"),
                    attr("asset", bytes32_to_hex(&identity)),
                    attr("request_id", bytes32_to_hex_binary(request_id)),
                    attr("owner", owner_addr),
                    attr("collection", collection),
                ],
                message_type: MessageType::AssetTransfer,
            })
        }
    }
}

// ============================================================================
// Handler: NonTokenTransfer
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn handle_non_token_transfer(
    deps: DepsMut,
    env: &Env,
    request_id: &Binary,
    owner: &str,
    origin_chain: &Binary,
    origin_contract: &str,
    listing_id: u64,
    asset_id: &str,
    asset_type: &str,
    target_contract: &str,
    price: Uint128,
) -> Result<DispatchOutcome, ContractError> {
    let origin_tag = parse_chain_tag(origin_chain)?;
    let identity =
        compute_asset_identity(&origin_tag, origin_contract, &AssetKey::NonToken(asset_id));
    let this_chain = THIS_CHAIN.load(deps.storage)?;

    match LOCKS.may_load(deps.storage, &identity)? {
        Some(record) if record.locked => {
            // Reactivate the local listing instead of moving token custody
            let owner_addr = deps.api.addr_validate(owner)?;
            let marketplace = if record.origin_chain == this_chain {
                record.origin_contract.clone()
            } else {
                record.target_contract.clone()
            };

            let mut record = record;
            record.locked = false;
            let completed = record.pending_request.take();
            LOCKS.save(deps.storage, &identity, &record)?;
            if let Some(rid) = completed {
                complete_request(deps.storage, &rid)?;
            }

            let reactivate = CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: marketplace,
                msg: to_json_binary(&MarketExecuteMsg::SetListingActive {
                    listing_id: record.token_or_listing_id,
                    active: true,
                })?,
                funds: vec![],
            });

            Ok(DispatchOutcome {
                messages: vec![reactivate],
                attributes: vec![
                    attr("handler", "listing_unlocked"),
                    attr("asset", bytes32_to_hex(&identity)),
                    attr("request_id", bytes32_to_hex_binary(request_id)),
                    attr("owner", owner_addr),
                    attr("listing_id", record.token_or_listing_id.to_string()),
                ],
                message_type: MessageType::NonTokenTransfer,
            })
        }
        Some(_) => Err(ContractError::AssetAlreadyExists),
        None => {
            // First arrival: have the local marketplace create the listing
            let owner_addr = deps.api.addr_validate(owner)?;
            let marketplace = deps.api.addr_validate(target_contract)?;

            let record = LockRecord {
                origin_contract: origin_contract.to_string(),
                target_contract: marketplace.to_string(),
                origin_chain: origin_tag,
                target_chain: this_chain,
                token_or_listing_id: listing_id,
                asset_id: Some(asset_id.to_string()),
                kind: AssetKind::NonToken,
                last_sync_price: price,
                last_sync_block: env.block.height,
                sync_count: 0,
                active: true,
                verified: false,
                locked: false,
                pending_request: None,
            };
            LOCKS.save(deps.storage, &identity, &record)?;
            NONTOKEN_INDEX.save(deps.storage, asset_id, &identity)?;

            let create = CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: marketplace.to_string(),
                msg: to_json_binary(&MarketExecuteMsg::CreateBridgedListing {
                    seller: owner_addr.to_string(),
                    asset_id: asset_id.to_string(),
                    asset_type: asset_type.to_string(),
                    price,
                })?,
                funds: vec![],
            });

            Ok(DispatchOutcome {
                messages: vec![create],
                attributes: vec![
                    attr("handler", "listing_arrived"),
                    attr("asset", bytes32_to_hex(&identity)),
                    attr("request_id", bytes32_to_hex_binary(request_id)),
                    attr("owner", owner_addr),
                    attr("marketplace", marketplace),
                ],
                message_type: MessageType::NonTokenTransfer,
            })
        }
    }
}

// ============================================================================
// Internal Helpers
// ============================================================================

/// Mark a locally tracked request completed.
pub(crate) fn complete_request(
    storage: &mut dyn Storage,
    request_id: &[u8; 32],
) -> Result<(), ContractError> {
    if let Some(mut request) = REQUESTS.may_load(storage, request_id)? {
        request.status = RequestStatus::Completed;
        REQUESTS.save(storage, request_id, &request)?;

        let mut stats = STATS.load(storage)?;
        stats.requests_completed += 1;
        STATS.save(storage, &stats)?;
    }
    Ok(())
}

/// Mark the request coupled to a message's asset as failed, if one is
/// tracked on this chain and still pending.
fn fail_tracked_request(
    storage: &mut dyn Storage,
    message: &BridgeMessage,
) -> Result<(), ContractError> {
    let identity = match message {
        BridgeMessage::AssetTransfer {
            origin_chain,
            origin_contract,
            token_id,
            ..
        } => {
            let Ok(tag) = parse_chain_tag(origin_chain) else {
                return Ok(());
            };
            compute_asset_identity(&tag, origin_contract, &AssetKey::Token(*token_id))
        }
        BridgeMessage::NonTokenTransfer {
            origin_chain,
            origin_contract,
            asset_id,
            ..
        } => {
            let Ok(tag) = parse_chain_tag(origin_chain) else {
                return Ok(());
            };
            compute_asset_identity(&tag, origin_contract, &AssetKey::NonToken(asset_id))
        }
    };

    if let Some(record) = LOCKS.may_load(storage, &identity)? {
        if let Some(rid) = record.pending_request {
            if let Some(mut request) = REQUESTS.may_load(storage, &rid)? {
                if matches!(request.status, RequestStatus::Pending) {
                    request.status = RequestStatus::Failed;
                    REQUESTS.save(storage, &rid, &request)?;
                }
            }
        }
    }
    Ok(())
}

/// Render a 32-byte request id carried as Binary; falls back to base64 for
/// malformed lengths (attributes must never fail).
fn bytes32_to_hex_binary(value: &Binary) -> String {
    match <[u8; 32]>::try_from(value.as_slice()) {
        Ok(bytes) => bytes32_to_hex(&bytes),
        Err(_) => value.to_base64(),
    }
}
