//! Administration handlers.
//!
//! Chain table management, fee and endpoint configuration, the authorized
//! registry-caller set, emergency pause, and the timelocked two-step admin
//! handover.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::identity::{chain_tag_to_hex, parse_chain_tag};
use crate::state::{
    ChainConfig, PendingAdmin, ADMIN_TIMELOCK_DURATION, AUTHORIZED_CALLERS, CHAINS, CONFIG,
    PENDING_ADMIN,
};

/// Reject non-admin callers.
fn ensure_admin(deps: &DepsMut, info: &MessageInfo) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

// ============================================================================
// Chain Management
// ============================================================================

/// Register a new chain with a predetermined 4-byte chain tag.
pub fn execute_register_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: Binary,
    identifier: String,
    endpoint: Binary,
    confirmations: u64,
    fee_bps: u32,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let tag = parse_chain_tag(&chain_id)?;
    if tag == [0u8; 4] {
        return Err(ContractError::ChainNotSupported {
            chain_tag: chain_tag_to_hex(&tag),
        });
    }
    if fee_bps > 10_000 {
        return Err(ContractError::InvalidFeeBps { fee_bps });
    }
    if CHAINS.may_load(deps.storage, &tag)?.is_some() {
        return Err(ContractError::ChainAlreadyRegistered {
            chain_tag: chain_tag_to_hex(&tag),
        });
    }

    let chain = ChainConfig {
        chain_id: tag,
        identifier: identifier.clone(),
        endpoint: endpoint.to_vec(),
        confirmations,
        fee_bps,
        enabled: true,
    };
    CHAINS.save(deps.storage, &tag, &chain)?;

    Ok(Response::new()
        .add_attribute("action", "register_chain")
        .add_attribute("chain_id", chain_tag_to_hex(&tag))
        .add_attribute("identifier", identifier)
        .add_attribute("confirmations", confirmations.to_string())
        .add_attribute("fee_bps", fee_bps.to_string()))
}

/// Update an existing chain configuration.
pub fn execute_update_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: Binary,
    endpoint: Option<Binary>,
    confirmations: Option<u64>,
    fee_bps: Option<u32>,
    enabled: Option<bool>,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let tag = parse_chain_tag(&chain_id)?;
    let mut chain = CHAINS
        .may_load(deps.storage, &tag)?
        .ok_or(ContractError::ChainNotSupported {
            chain_tag: chain_tag_to_hex(&tag),
        })?;

    if let Some(endpoint) = endpoint {
        chain.endpoint = endpoint.to_vec();
    }
    if let Some(confirmations) = confirmations {
        chain.confirmations = confirmations;
    }
    if let Some(fee_bps) = fee_bps {
        if fee_bps > 10_000 {
            return Err(ContractError::InvalidFeeBps { fee_bps });
        }
        chain.fee_bps = fee_bps;
    }
    if let Some(enabled) = enabled {
        chain.enabled = enabled;
    }
    CHAINS.save(deps.storage, &tag, &chain)?;

    Ok(Response::new()
        .add_attribute("action", "update_chain")
        .add_attribute("chain_id", chain_tag_to_hex(&tag))
        .add_attribute("enabled", chain.enabled.to_string()))
}

/// Unregister an existing chain.
pub fn execute_unregister_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: Binary,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let tag = parse_chain_tag(&chain_id)?;
    if CHAINS.may_load(deps.storage, &tag)?.is_none() {
        return Err(ContractError::ChainNotSupported {
            chain_tag: chain_tag_to_hex(&tag),
        });
    }
    CHAINS.remove(deps.storage, &tag);

    Ok(Response::new()
        .add_attribute("action", "unregister_chain")
        .add_attribute("chain_id", chain_tag_to_hex(&tag)))
}

// ============================================================================
// Fee & Endpoint Configuration
// ============================================================================

pub fn execute_update_fee_params(
    deps: DepsMut,
    info: MessageInfo,
    min_bridge_fee: Option<Uint128>,
    fee_collector: Option<String>,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let mut config = CONFIG.load(deps.storage)?;
    if let Some(min_bridge_fee) = min_bridge_fee {
        config.min_bridge_fee = min_bridge_fee;
    }
    if let Some(fee_collector) = fee_collector {
        config.fee_collector = deps.api.addr_validate(&fee_collector)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_fee_params")
        .add_attribute("min_bridge_fee", config.min_bridge_fee.to_string())
        .add_attribute("fee_collector", config.fee_collector))
}

pub fn execute_set_transport(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.transport = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_transport")
        .add_attribute("transport", address))
}

pub fn execute_set_marketplace(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.marketplace = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_marketplace")
        .add_attribute("marketplace", address))
}

// ============================================================================
// Authorized Caller Management
// ============================================================================

pub fn execute_add_authorized_caller(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let caller = deps.api.addr_validate(&address)?;
    AUTHORIZED_CALLERS.save(deps.storage, &caller, &true)?;

    Ok(Response::new()
        .add_attribute("action", "add_authorized_caller")
        .add_attribute("caller", address))
}

pub fn execute_remove_authorized_caller(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let caller = deps.api.addr_validate(&address)?;
    AUTHORIZED_CALLERS.remove(deps.storage, &caller);

    Ok(Response::new()
        .add_attribute("action", "remove_authorized_caller")
        .add_attribute("caller", address))
}

// ============================================================================
// Pause
// ============================================================================

pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "pause"))
}

pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "unpause"))
}

// ============================================================================
// Admin Handover (timelocked)
// ============================================================================

pub fn execute_propose_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    let new_address = deps.api.addr_validate(&new_admin)?;
    let execute_after = env.block.time.plus_seconds(ADMIN_TIMELOCK_DURATION);
    PENDING_ADMIN.save(
        deps.storage,
        &PendingAdmin {
            new_address: new_address.clone(),
            execute_after,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "propose_admin")
        .add_attribute("new_admin", new_address)
        .add_attribute("execute_after", execute_after.seconds().to_string()))
}

pub fn execute_accept_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;

    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }
    if env.block.time < pending.execute_after {
        return Err(ContractError::TimelockNotExpired {
            remaining_seconds: pending.execute_after.seconds() - env.block.time.seconds(),
        });
    }

    let mut config = CONFIG.load(deps.storage)?;
    config.admin = pending.new_address.clone();
    CONFIG.save(deps.storage, &config)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "accept_admin")
        .add_attribute("admin", pending.new_address))
}

pub fn execute_cancel_admin_proposal(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    ensure_admin(&deps, &info)?;

    if PENDING_ADMIN.may_load(deps.storage)?.is_none() {
        return Err(ContractError::NoPendingAdmin);
    }
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new().add_attribute("action", "cancel_admin_proposal"))
}
