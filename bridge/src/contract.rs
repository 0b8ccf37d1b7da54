//! NovaMarket Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_add_authorized_caller, execute_cancel_admin_proposal,
    execute_deliver, execute_initiate_bridge, execute_lock_asset, execute_mark_asset_verified,
    execute_pause, execute_propose_admin, execute_queue_message, execute_register_asset,
    execute_register_chain, execute_remove_authorized_caller, execute_retry_message,
    execute_set_marketplace, execute_set_transport, execute_unlock_asset, execute_unpause,
    execute_unregister_chain, execute_update_chain, execute_update_fee_params,
    execute_update_sync,
};
use crate::identity::parse_chain_tag;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_asset_identity, query_authorized_callers, query_bridge_request, query_chain,
    query_chains, query_config, query_lock_record, query_pending_admin, query_pending_messages,
    query_processed, query_requests_by_owner, query_retry_entry, query_stats, query_status,
};
use crate::state::{
    Config, Stats, AUTHORIZED_CALLERS, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, STATS, THIS_CHAIN,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let transport = deps.api.addr_validate(&msg.transport)?;
    let marketplace = deps.api.addr_validate(&msg.marketplace)?;
    let fee_collector = deps.api.addr_validate(&msg.fee_collector)?;

    let this_chain = parse_chain_tag(&msg.this_chain)?;
    if this_chain == [0u8; 4] {
        return Err(ContractError::ChainNotSupported {
            chain_tag: "0x00000000".to_string(),
        });
    }
    THIS_CHAIN.save(deps.storage, &this_chain)?;

    let config = Config {
        admin,
        transport,
        marketplace,
        fee_collector,
        min_bridge_fee: msg.min_bridge_fee,
        fee_denom: msg.fee_denom,
        paused: false,
    };
    CONFIG.save(deps.storage, &config)?;

    let mut caller_count = 0u32;
    for caller in msg.authorized_callers {
        let caller = deps.api.addr_validate(&caller)?;
        AUTHORIZED_CALLERS.save(deps.storage, &caller, &true)?;
        caller_count += 1;
    }

    let stats = Stats {
        requests_created: 0,
        requests_completed: 0,
        messages_processed: 0,
        messages_failed: 0,
        retries_succeeded: 0,
        fees_collected: Uint128::zero(),
    };
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("transport", config.transport)
        .add_attribute("authorized_callers", caller_count.to_string())
        .add_attribute("this_chain", format!("0x{}", hex::encode(this_chain))))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Bridge controller
        ExecuteMsg::InitiateBridge {
            target_chain,
            target_contract,
            asset,
            adapter_params,
        } => execute_initiate_bridge(
            deps,
            env,
            info,
            target_chain,
            target_contract,
            asset,
            adapter_params,
        ),

        // Inbound message processor
        ExecuteMsg::Deliver {
            source_chain,
            source_endpoint,
            sequence,
            payload,
        } => execute_deliver(
            deps,
            env,
            info,
            source_chain,
            source_endpoint,
            sequence,
            payload,
        ),
        ExecuteMsg::RetryMessage {
            source_chain,
            source_endpoint,
            sequence,
            payload,
        } => execute_retry_message(
            deps,
            env,
            info,
            source_chain,
            source_endpoint,
            sequence,
            payload,
        ),

        // Registry
        ExecuteMsg::RegisterAsset {
            origin_contract,
            token_or_listing_id,
            origin_chain,
            target_chain,
            target_contract,
            initial_price,
        } => execute_register_asset(
            deps,
            env,
            info,
            origin_contract,
            token_or_listing_id,
            origin_chain,
            target_chain,
            target_contract,
            initial_price,
        ),
        ExecuteMsg::UpdateSync {
            asset,
            new_price,
            target_chain,
        } => execute_update_sync(deps, env, info, asset, new_price, target_chain),
        ExecuteMsg::QueueMessage {
            message_type,
            source_chain,
            target_chain,
            payload,
        } => execute_queue_message(
            deps,
            env,
            info,
            message_type,
            source_chain,
            target_chain,
            payload,
        ),
        ExecuteMsg::LockAsset { asset } => execute_lock_asset(deps, info, asset),
        ExecuteMsg::UnlockAsset { asset } => execute_unlock_asset(deps, info, asset),
        ExecuteMsg::MarkAssetVerified { asset } => execute_mark_asset_verified(deps, info, asset),

        // Chain management
        ExecuteMsg::RegisterChain {
            chain_id,
            identifier,
            endpoint,
            confirmations,
            fee_bps,
        } => execute_register_chain(
            deps,
            info,
            chain_id,
            identifier,
            endpoint,
            confirmations,
            fee_bps,
        ),
        ExecuteMsg::UpdateChain {
            chain_id,
            endpoint,
            confirmations,
            fee_bps,
            enabled,
        } => execute_update_chain(deps, info, chain_id, endpoint, confirmations, fee_bps, enabled),
        ExecuteMsg::UnregisterChain { chain_id } => execute_unregister_chain(deps, info, chain_id),

        // Configuration
        ExecuteMsg::UpdateFeeParams {
            min_bridge_fee,
            fee_collector,
        } => execute_update_fee_params(deps, info, min_bridge_fee, fee_collector),
        ExecuteMsg::SetTransport { address } => execute_set_transport(deps, info, address),
        ExecuteMsg::SetMarketplace { address } => execute_set_marketplace(deps, info, address),
        ExecuteMsg::AddAuthorizedCaller { address } => {
            execute_add_authorized_caller(deps, info, address)
        }
        ExecuteMsg::RemoveAuthorizedCaller { address } => {
            execute_remove_authorized_caller(deps, info, address)
        }

        // Admin operations
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::ProposeAdmin { new_admin } => execute_propose_admin(deps, env, info, new_admin),
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, env, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Status {} => to_json_binary(&query_status(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::Chain { chain_id } => to_json_binary(&query_chain(deps, chain_id)?),
        QueryMsg::Chains { start_after, limit } => {
            to_json_binary(&query_chains(deps, start_after, limit)?)
        }
        QueryMsg::AssetIdentity {
            origin_chain,
            contract_ref,
            key,
        } => to_json_binary(&query_asset_identity(origin_chain, contract_ref, key)?),
        QueryMsg::LockRecord { asset } => to_json_binary(&query_lock_record(deps, asset)?),
        QueryMsg::BridgeRequest { request_id } => {
            to_json_binary(&query_bridge_request(deps, request_id)?)
        }
        QueryMsg::RequestsByOwner {
            owner,
            start_after,
            limit,
        } => to_json_binary(&query_requests_by_owner(deps, owner, start_after, limit)?),
        QueryMsg::PendingMessages {
            target_chain,
            start_after,
            limit,
        } => to_json_binary(&query_pending_messages(
            deps,
            target_chain,
            start_after,
            limit,
        )?),
        QueryMsg::Processed { payload_hash } => {
            to_json_binary(&query_processed(deps, payload_hash)?)
        }
        QueryMsg::RetryEntry {
            source_chain,
            source_endpoint,
            sequence,
        } => to_json_binary(&query_retry_entry(
            deps,
            source_chain,
            source_endpoint,
            sequence,
        )?),
        QueryMsg::AuthorizedCallers {} => to_json_binary(&query_authorized_callers(deps)?),
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
