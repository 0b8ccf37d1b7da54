#![allow(dead_code)]

//! Mock collaborator contracts for the integration suites.
//!
//! The transport, marketplace and wrapped-collection collaborators are
//! external to the bridge; these mocks speak the interfaces defined in the
//! `common` package. The origin-chain NFT ledger in the tests is the real
//! `cw721-base` contract.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw_multi_test::{AppResponse, Contract, ContractWrapper};
use cw_storage_plus::{Item, Map};

use common::{
    FeeEstimateResponse, ListingResponse, MarketExecuteMsg, MarketQueryMsg, TransportExecuteMsg,
    TransportQueryMsg,
};

/// Native fee denom used across the suites.
pub const FEE_DENOM: &str = "uluna";

/// Fee the mock transport quotes for every payload.
pub const TRANSPORT_FEE: u128 = 500;

/// Build a 4-byte chain tag.
pub fn chain_tag(n: u8) -> Binary {
    Binary::from(vec![0, 0, 0, n])
}

/// Find an attribute value anywhere in a response.
pub fn attr_value(res: &AppResponse, key: &str) -> Option<String> {
    res.events
        .iter()
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}

pub fn contract_bridge() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        bridge::contract::execute,
        bridge::contract::instantiate,
        bridge::contract::query,
    ))
}

pub fn contract_cw721() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw721_base::entry::execute,
        cw721_base::entry::instantiate,
        cw721_base::entry::query,
    ))
}

// ============================================================================
// Mock Transport
// ============================================================================

fn transport_instantiate(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    Ok(Response::new())
}

/// Accepts sends and echoes the payload so tests can forward it by hand.
fn transport_execute(
    _deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: TransportExecuteMsg,
) -> StdResult<Response> {
    match msg {
        TransportExecuteMsg::Send {
            target_chain,
            target_endpoint,
            payload,
            refund,
            ..
        } => Ok(Response::new()
            .add_attribute("action", "transport_send")
            .add_attribute("sender", info.sender)
            .add_attribute("target_chain", target_chain.to_base64())
            .add_attribute("target_endpoint", target_endpoint.to_base64())
            .add_attribute("payload", payload.to_base64())
            .add_attribute("refund", refund)),
    }
}

fn transport_query(_deps: Deps, _env: Env, msg: TransportQueryMsg) -> StdResult<Binary> {
    match msg {
        TransportQueryMsg::EstimateFee { .. } => to_json_binary(&FeeEstimateResponse {
            native_fee: Uint128::new(TRANSPORT_FEE),
            alt_fee: Uint128::zero(),
        }),
    }
}

pub fn contract_transport() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        transport_execute,
        transport_instantiate,
        transport_query,
    ))
}

// ============================================================================
// Mock Marketplace
// ============================================================================

#[cw_serde]
pub struct SeededListing {
    pub id: u64,
    pub listing: ListingResponse,
}

#[cw_serde]
pub struct MarketInstantiateMsg {
    pub listings: Vec<SeededListing>,
}

const LISTINGS: Map<u64, ListingResponse> = Map::new("listings");
const NEXT_LISTING_ID: Item<u64> = Item::new("next_listing_id");

fn market_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: MarketInstantiateMsg,
) -> StdResult<Response> {
    let mut next = 1u64;
    for entry in msg.listings {
        LISTINGS.save(deps.storage, entry.id, &entry.listing)?;
        next = next.max(entry.id + 1);
    }
    NEXT_LISTING_ID.save(deps.storage, &next)?;
    Ok(Response::new())
}

fn market_execute(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: MarketExecuteMsg,
) -> StdResult<Response> {
    match msg {
        MarketExecuteMsg::SetListingActive { listing_id, active } => {
            let mut listing = LISTINGS.load(deps.storage, listing_id)?;
            listing.active = active;
            LISTINGS.save(deps.storage, listing_id, &listing)?;
            Ok(Response::new()
                .add_attribute("action", "set_listing_active")
                .add_attribute("listing_id", listing_id.to_string())
                .add_attribute("active", active.to_string()))
        }
        MarketExecuteMsg::CreateBridgedListing {
            seller,
            asset_id,
            asset_type,
            price,
        } => {
            let listing_id = NEXT_LISTING_ID.load(deps.storage)?;
            NEXT_LISTING_ID.save(deps.storage, &(listing_id + 1))?;
            let listing = ListingResponse {
                seller,
                active: true,
                transferable: true,
                expires_at: env.block.time.plus_seconds(365 * 86_400),
                asset_id,
                asset_type,
                price,
            };
            LISTINGS.save(deps.storage, listing_id, &listing)?;
            Ok(Response::new()
                .add_attribute("action", "create_bridged_listing")
                .add_attribute("listing_id", listing_id.to_string()))
        }
    }
}

fn market_query(deps: Deps, _env: Env, msg: MarketQueryMsg) -> StdResult<Binary> {
    match msg {
        MarketQueryMsg::Listing { listing_id } => {
            to_json_binary(&LISTINGS.load(deps.storage, listing_id)?)
        }
    }
}

pub fn contract_marketplace() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        market_execute,
        market_instantiate,
        market_query,
    ))
}

// ============================================================================
// Mock Wrapped Collection
// ============================================================================

/// Wire-compatible with both the bridge's `CollectionExecuteMsg::Mint` and
/// the cw721 `TransferNft` it sends when releasing custody.
#[cw_serde]
pub enum CollectionMockExecuteMsg {
    Mint { token_id: String, owner: String },
    TransferNft { recipient: String, token_id: String },
}

#[cw_serde]
pub enum CollectionMockQueryMsg {
    OwnerOf {
        token_id: String,
        include_expired: Option<bool>,
    },
}

const OWNERS: Map<&str, String> = Map::new("owners");

fn collection_instantiate(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    Ok(Response::new())
}

fn collection_execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: CollectionMockExecuteMsg,
) -> StdResult<Response> {
    match msg {
        CollectionMockExecuteMsg::Mint { token_id, owner } => {
            OWNERS.save(deps.storage, &token_id, &owner)?;
            Ok(Response::new()
                .add_attribute("action", "mint")
                .add_attribute("token_id", token_id)
                .add_attribute("owner", owner))
        }
        CollectionMockExecuteMsg::TransferNft {
            recipient,
            token_id,
        } => {
            OWNERS.load(deps.storage, &token_id)?;
            OWNERS.save(deps.storage, &token_id, &recipient)?;
            Ok(Response::new()
                .add_attribute("action", "transfer_nft")
                .add_attribute("token_id", token_id)
                .add_attribute("recipient", recipient))
        }
    }
}

fn collection_query(deps: Deps, _env: Env, msg: CollectionMockQueryMsg) -> StdResult<Binary> {
    match msg {
        CollectionMockQueryMsg::OwnerOf { token_id, .. } => {
            let owner = OWNERS.load(deps.storage, &token_id)?;
            to_json_binary(&cw721::OwnerOfResponse {
                owner,
                approvals: vec![],
            })
        }
    }
}

pub fn contract_collection_mock() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        collection_execute,
        collection_instantiate,
        collection_query,
    ))
}
