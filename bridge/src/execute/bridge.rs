//! Bridge Controller: outbound bridge initiation.
//!
//! `InitiateBridge` validates ownership or listing state, derives the asset
//! identity, locks the asset, records a pending request, and submits the
//! transfer message to the transport. All state writes land before the
//! custody and transport submessages run, so a reentrant call observes the
//! already-locked state and is rejected.

use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo,
    Response, Uint128, WasmMsg,
};

use common::{
    FeeEstimateResponse, ListingResponse, MarketExecuteMsg, MarketQueryMsg, TransportExecuteMsg,
    TransportQueryMsg,
};

use crate::codec::{encode_message, payload_hash, BridgeMessage};
use crate::error::ContractError;
use crate::execute::registry::append_queue;
use crate::identity::{
    bytes32_to_hex, chain_tag_to_hex, compute_asset_identity, derive_request_id, parse_chain_tag,
    AssetKey,
};
use crate::msg::AssetRef;
use crate::state::{
    AssetKind, BridgeRequest, LockRecord, NonTokenAssetType, RequestStatus, CHAINS, CONFIG, LOCKS,
    NONTOKEN_INDEX, REQUESTS, REQUESTS_BY_OWNER, STATS, THIS_CHAIN, TOKEN_INDEX,
};

/// Asset-specific data assembled during validation, before any state write.
struct PreparedAsset {
    identity: [u8; 32],
    origin_chain: [u8; 4],
    origin_contract: String,
    token_or_listing_id: u64,
    asset_id: Option<String>,
    asset_type: Option<NonTokenAssetType>,
    kind: AssetKind,
    price: Uint128,
    custody_msg: CosmosMsg,
    existing: Option<LockRecord>,
}

pub fn execute_initiate_bridge(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    target_chain: Binary,
    target_contract: String,
    asset: AssetRef,
    adapter_params: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    let target_tag = parse_chain_tag(&target_chain)?;
    let chain = CHAINS
        .may_load(deps.storage, &target_tag)?
        .ok_or(ContractError::ChainNotSupported {
            chain_tag: chain_tag_to_hex(&target_tag),
        })?;
    if !chain.enabled {
        return Err(ContractError::ChainNotSupported {
            chain_tag: chain_tag_to_hex(&target_tag),
        });
    }

    let this_chain = THIS_CHAIN.load(deps.storage)?;

    let prepared = match &asset {
        AssetRef::Token { contract, token_id } => {
            prepare_token(deps.as_ref(), &env, &info, &this_chain, contract, *token_id)?
        }
        AssetRef::Listing {
            listing_id,
            asset_id,
        } => prepare_listing(
            deps.as_ref(),
            &env,
            &info,
            &config.marketplace,
            &this_chain,
            *listing_id,
            asset_id,
        )?,
    };

    let request_key = match &prepared.asset_id {
        Some(asset_id) => AssetKey::NonToken(asset_id),
        None => AssetKey::Token(prepared.token_or_listing_id),
    };
    let request_id = derive_request_id(
        info.sender.as_str(),
        &prepared.origin_contract,
        &request_key,
        &target_tag,
        env.block.time.nanos(),
    );

    let message = build_message(&prepared, &request_id, &info, &target_contract, &env);
    let payload = encode_message(&message)?;

    // Fee check: quoted transport fee plus the configured minimum
    let quote: FeeEstimateResponse = deps.querier.query_wasm_smart(
        config.transport.clone(),
        &TransportQueryMsg::EstimateFee {
            target_chain: target_chain.clone(),
            sender: env.contract.address.to_string(),
            payload: payload.clone(),
            use_alt_token: false,
            adapter_params: adapter_params.clone(),
        },
    )?;
    let required = quote.native_fee + config.min_bridge_fee;
    let attached = info
        .funds
        .iter()
        .find(|c| c.denom == config.fee_denom)
        .map(|c| c.amount)
        .unwrap_or_default();
    if attached.is_zero() && !required.is_zero() {
        return Err(ContractError::NoFundsSent);
    }
    if attached < required {
        return Err(ContractError::InsufficientFee {
            expected: required,
            got: attached,
        });
    }

    // Lock before anything leaves the contract
    let record = match prepared.existing.clone() {
        Some(mut record) => {
            record.locked = true;
            record.target_chain = target_tag;
            record.token_or_listing_id = prepared.token_or_listing_id;
            record.pending_request = Some(request_id);
            record
        }
        None => LockRecord {
            origin_contract: prepared.origin_contract.clone(),
            target_contract: target_contract.clone(),
            origin_chain: prepared.origin_chain,
            target_chain: target_tag,
            token_or_listing_id: prepared.token_or_listing_id,
            asset_id: prepared.asset_id.clone(),
            kind: prepared.kind.clone(),
            last_sync_price: prepared.price,
            last_sync_block: env.block.height,
            sync_count: 0,
            active: true,
            verified: false,
            locked: true,
            pending_request: Some(request_id),
        },
    };
    LOCKS.save(deps.storage, &prepared.identity, &record)?;

    match &asset {
        AssetRef::Token { contract, token_id } => {
            TOKEN_INDEX.save(deps.storage, (contract.as_str(), *token_id), &prepared.identity)?;
        }
        AssetRef::Listing { asset_id, .. } => {
            NONTOKEN_INDEX.save(deps.storage, asset_id.as_str(), &prepared.identity)?;
        }
    }

    // Durable Pending request before the outbound send is attempted
    let request = BridgeRequest {
        owner: info.sender.clone(),
        origin_contract: prepared.origin_contract.clone(),
        target_contract: target_contract.clone(),
        token_or_listing_id: prepared.token_or_listing_id,
        asset_id: prepared.asset_id.clone(),
        asset_type: prepared.asset_type.clone(),
        is_token: matches!(prepared.kind, AssetKind::Token),
        fee: attached,
        timestamp: env.block.time,
        target_chain: target_tag,
        status: RequestStatus::Pending,
    };
    REQUESTS.save(deps.storage, &request_id, &request)?;
    REQUESTS_BY_OWNER.save(deps.storage, (&info.sender, &request_id), &true)?;

    let message_type = message.message_type();
    let hash = payload_hash(&payload);
    append_queue(
        deps.storage,
        &env,
        &target_tag,
        hash,
        message_type.clone(),
        this_chain,
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.requests_created += 1;
    stats.fees_collected += config.min_bridge_fee;
    STATS.save(deps.storage, &stats)?;

    let mut messages: Vec<CosmosMsg> = vec![prepared.custody_msg];
    if !config.min_bridge_fee.is_zero() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: config.fee_collector.to_string(),
            amount: coins(config.min_bridge_fee.u128(), config.fee_denom.clone()),
        }));
    }
    let transport_funds = attached - config.min_bridge_fee;
    messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.transport.to_string(),
        msg: to_json_binary(&TransportExecuteMsg::Send {
            target_chain,
            target_endpoint: Binary::from(chain.endpoint),
            payload,
            refund: info.sender.to_string(),
            alt_payment: None,
            adapter_params,
        })?,
        funds: coins(transport_funds.u128(), config.fee_denom),
    }));

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "initiate_bridge")
        .add_attribute("request_id", bytes32_to_hex(&request_id))
        .add_attribute("asset", bytes32_to_hex(&prepared.identity))
        .add_attribute("owner", info.sender)
        .add_attribute("target_chain", chain_tag_to_hex(&target_tag))
        .add_attribute("message_type", message_type.as_str())
        .add_attribute("fee", attached.to_string())
        .add_attribute("transport_fee", quote.native_fee.to_string()))
}

/// Validate a token asset and assemble its bridge data.
fn prepare_token(
    deps: Deps,
    env: &Env,
    info: &MessageInfo,
    this_chain: &[u8; 4],
    contract: &str,
    token_id: u64,
) -> Result<PreparedAsset, ContractError> {
    // A token that arrived over the bridge keeps its origin coordinates
    let identity = match TOKEN_INDEX.may_load(deps.storage, (contract, token_id))? {
        Some(identity) => identity,
        None => compute_asset_identity(this_chain, contract, &AssetKey::Token(token_id)),
    };
    let existing = LOCKS.may_load(deps.storage, &identity)?;
    let (origin_chain, origin_contract) = match &existing {
        Some(record) => (record.origin_chain, record.origin_contract.clone()),
        None => (*this_chain, contract.to_string()),
    };

    // Double-bridge rejected before the holder check: once locked, custody
    // sits with the bridge and the holder check would mask the conflict
    if let Some(record) = &existing {
        if record.locked {
            return Err(ContractError::AssetAlreadyLocked);
        }
    }

    let holder: cw721::OwnerOfResponse = deps.querier.query_wasm_smart(
        contract.to_string(),
        &cw721::Cw721QueryMsg::OwnerOf {
            token_id: token_id.to_string(),
            include_expired: None,
        },
    )?;
    if holder.owner != info.sender.as_str() {
        return Err(ContractError::NotAssetHolder { token_id });
    }

    let custody_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: contract.to_string(),
        msg: to_json_binary(&cw721::Cw721ExecuteMsg::TransferNft {
            recipient: env.contract.address.to_string(),
            token_id: token_id.to_string(),
        })?,
        funds: vec![],
    });

    Ok(PreparedAsset {
        identity,
        origin_chain,
        origin_contract,
        token_or_listing_id: token_id,
        asset_id: None,
        asset_type: None,
        kind: AssetKind::Token,
        price: Uint128::zero(),
        custody_msg,
        existing,
    })
}

/// Validate a non-token listing and assemble its bridge data.
fn prepare_listing(
    deps: Deps,
    env: &Env,
    info: &MessageInfo,
    marketplace: &Addr,
    this_chain: &[u8; 4],
    listing_id: u64,
    asset_id: &str,
) -> Result<PreparedAsset, ContractError> {
    let identity = match NONTOKEN_INDEX.may_load(deps.storage, asset_id)? {
        Some(identity) => identity,
        None => compute_asset_identity(
            this_chain,
            marketplace.as_str(),
            &AssetKey::NonToken(asset_id),
        ),
    };
    let existing = LOCKS.may_load(deps.storage, &identity)?;
    let (origin_chain, origin_contract) = match &existing {
        Some(record) => (record.origin_chain, record.origin_contract.clone()),
        None => (*this_chain, marketplace.to_string()),
    };

    // Double-bridge rejected before the listing checks: locking deactivated
    // the listing, so the activity check would mask the conflict
    if let Some(record) = &existing {
        if record.locked {
            return Err(ContractError::AssetAlreadyLocked);
        }
    }

    let listing: ListingResponse = deps.querier.query_wasm_smart(
        marketplace.to_string(),
        &MarketQueryMsg::Listing { listing_id },
    )?;
    if listing.seller != info.sender.as_str() {
        return Err(ContractError::NotListingSeller { listing_id });
    }
    if !listing.active {
        return Err(ContractError::ListingInactive { listing_id });
    }
    if listing.expires_at <= env.block.time {
        return Err(ContractError::ListingExpired { listing_id });
    }
    if !listing.transferable {
        return Err(ContractError::ListingNotTransferable { listing_id });
    }
    if listing.asset_id != asset_id {
        return Err(ContractError::ListingAssetMismatch);
    }
    let asset_type = NonTokenAssetType::parse(&listing.asset_type)?;

    // Deactivate the listing so the asset cannot be resold while bridging
    let custody_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: marketplace.to_string(),
        msg: to_json_binary(&MarketExecuteMsg::SetListingActive {
            listing_id,
            active: false,
        })?,
        funds: vec![],
    });

    Ok(PreparedAsset {
        identity,
        origin_chain,
        origin_contract,
        token_or_listing_id: listing_id,
        asset_id: Some(asset_id.to_string()),
        asset_type: Some(asset_type),
        kind: AssetKind::NonToken,
        price: listing.price,
        custody_msg,
        existing,
    })
}

/// Assemble the wire message for a prepared asset.
fn build_message(
    prepared: &PreparedAsset,
    request_id: &[u8; 32],
    info: &MessageInfo,
    target_contract: &str,
    env: &Env,
) -> BridgeMessage {
    match prepared.kind {
        AssetKind::Token => BridgeMessage::AssetTransfer {
            request_id: Binary::from(request_id.to_vec()),
            owner: info.sender.to_string(),
            origin_chain: Binary::from(prepared.origin_chain.to_vec()),
            origin_contract: prepared.origin_contract.clone(),
            token_id: prepared.token_or_listing_id,
            target_contract: target_contract.to_string(),
            timestamp: env.block.time.nanos(),
        },
        AssetKind::NonToken => BridgeMessage::NonTokenTransfer {
            request_id: Binary::from(request_id.to_vec()),
            owner: info.sender.to_string(),
            origin_chain: Binary::from(prepared.origin_chain.to_vec()),
            origin_contract: prepared.origin_contract.clone(),
            listing_id: prepared.token_or_listing_id,
            asset_id: prepared.asset_id.clone().unwrap_or_default(),
            asset_type: prepared
                .asset_type
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            target_contract: target_contract.to_string(),
            price: prepared.price,
            timestamp: env.block.time.nanos(),
        },
    }
}
