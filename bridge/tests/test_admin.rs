//! Integration tests for chain and configuration administration.
//!
//! Covers chain registration/update/unregistration, fee parameter updates,
//! endpoint reconfiguration, pause authorization, and the timelocked admin
//! handover.

mod mock;

use cosmwasm_std::{Addr, Binary, Uint128};
use cw_multi_test::{App, Executor};

use bridge::msg::{
    ChainResponse, ChainsResponse, ConfigResponse, ExecuteMsg, InstantiateMsg,
    PendingAdminResponse, QueryMsg, StatusResponse,
};
use bridge::ContractError;
use mock::{chain_tag, contract_bridge};

const ADMIN: &str = "terra1admin";
const STRANGER: &str = "terra1stranger";

/// Admin handover timelock (7 days).
const TIMELOCK: u64 = 604_800;

fn setup() -> (App, Addr) {
    let mut app = App::default();
    let admin = Addr::unchecked(ADMIN);

    let bridge_code = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            bridge_code,
            admin,
            &InstantiateMsg {
                admin: ADMIN.to_string(),
                transport: "terra1transport".to_string(),
                marketplace: "terra1market".to_string(),
                fee_collector: "terra1collector".to_string(),
                min_bridge_fee: Uint128::new(100),
                fee_denom: "uluna".to_string(),
                this_chain: chain_tag(1),
                authorized_callers: vec!["terra1keeper".to_string()],
            },
            &[],
            "bridge",
            Some(ADMIN.to_string()),
        )
        .unwrap();

    (app, bridge)
}

fn register_chain_msg(n: u8) -> ExecuteMsg {
    ExecuteMsg::RegisterChain {
        chain_id: chain_tag(n),
        identifier: format!("novamarket_{n}"),
        endpoint: Binary::from(b"bridge-remote".to_vec()),
        confirmations: 6,
        fee_bps: 250,
    }
}

// ============================================================================
// Chain Management
// ============================================================================

#[test]
fn test_register_chain() {
    let (mut app, bridge) = setup();

    app.execute_contract(Addr::unchecked(ADMIN), bridge.clone(), &register_chain_msg(2), &[])
        .unwrap();

    let chain: ChainResponse = app
        .wrap()
        .query_wasm_smart(
            &bridge,
            &QueryMsg::Chain {
                chain_id: chain_tag(2),
            },
        )
        .unwrap();
    assert_eq!(chain.identifier, "novamarket_2");
    assert_eq!(chain.confirmations, 6);
    assert_eq!(chain.fee_bps, 250);
    assert!(chain.enabled);
}

#[test]
fn test_register_chain_duplicate() {
    let (mut app, bridge) = setup();

    app.execute_contract(Addr::unchecked(ADMIN), bridge.clone(), &register_chain_msg(2), &[])
        .unwrap();
    let err = app
        .execute_contract(Addr::unchecked(ADMIN), bridge, &register_chain_msg(2), &[])
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::ChainAlreadyRegistered {
            chain_tag: "0x00000002".to_string(),
        }
    );
}

#[test]
fn test_register_chain_zero_tag() {
    let (mut app, bridge) = setup();

    let err = app
        .execute_contract(Addr::unchecked(ADMIN), bridge, &register_chain_msg(0), &[])
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::ChainNotSupported {
            chain_tag: "0x00000000".to_string(),
        }
    );
}

#[test]
fn test_register_chain_invalid_fee_bps() {
    let (mut app, bridge) = setup();

    let err = app
        .execute_contract(
            Addr::unchecked(ADMIN),
            bridge,
            &ExecuteMsg::RegisterChain {
                chain_id: chain_tag(2),
                identifier: "novamarket_2".to_string(),
                endpoint: Binary::from(b"bridge-remote".to_vec()),
                confirmations: 6,
                fee_bps: 10_001,
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::InvalidFeeBps { fee_bps: 10_001 }
    );
}

#[test]
fn test_register_chain_requires_admin() {
    let (mut app, bridge) = setup();

    let err = app
        .execute_contract(Addr::unchecked(STRANGER), bridge, &register_chain_msg(2), &[])
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Unauthorized
    );
}

#[test]
fn test_update_and_unregister_chain() {
    let (mut app, bridge) = setup();
    app.execute_contract(Addr::unchecked(ADMIN), bridge.clone(), &register_chain_msg(2), &[])
        .unwrap();

    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::UpdateChain {
            chain_id: chain_tag(2),
            endpoint: Some(Binary::from(b"bridge-remote-v2".to_vec())),
            confirmations: Some(12),
            fee_bps: Some(100),
            enabled: Some(false),
        },
        &[],
    )
    .unwrap();

    let chain: ChainResponse = app
        .wrap()
        .query_wasm_smart(
            &bridge,
            &QueryMsg::Chain {
                chain_id: chain_tag(2),
            },
        )
        .unwrap();
    assert_eq!(chain.endpoint, Binary::from(b"bridge-remote-v2".to_vec()));
    assert_eq!(chain.confirmations, 12);
    assert_eq!(chain.fee_bps, 100);
    assert!(!chain.enabled);

    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::UnregisterChain {
            chain_id: chain_tag(2),
        },
        &[],
    )
    .unwrap();
    let res: Result<ChainResponse, _> = app.wrap().query_wasm_smart(
        &bridge,
        &QueryMsg::Chain {
            chain_id: chain_tag(2),
        },
    );
    assert!(res.is_err());
}

#[test]
fn test_chains_pagination() {
    let (mut app, bridge) = setup();
    for n in 2..=4 {
        app.execute_contract(
            Addr::unchecked(ADMIN),
            bridge.clone(),
            &register_chain_msg(n),
            &[],
        )
        .unwrap();
    }

    let page: ChainsResponse = app
        .wrap()
        .query_wasm_smart(
            &bridge,
            &QueryMsg::Chains {
                start_after: None,
                limit: Some(2),
            },
        )
        .unwrap();
    assert_eq!(page.chains.len(), 2);
    assert_eq!(page.chains[0].chain_id, chain_tag(2));

    let rest: ChainsResponse = app
        .wrap()
        .query_wasm_smart(
            &bridge,
            &QueryMsg::Chains {
                start_after: Some(page.chains[1].chain_id.clone()),
                limit: Some(10),
            },
        )
        .unwrap();
    assert_eq!(rest.chains.len(), 1);
    assert_eq!(rest.chains[0].chain_id, chain_tag(4));

    let status: StatusResponse = app
        .wrap()
        .query_wasm_smart(&bridge, &QueryMsg::Status {})
        .unwrap();
    assert_eq!(status.registered_chains, 3);
    assert_eq!(status.authorized_callers, 1);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_update_fee_params_and_endpoints() {
    let (mut app, bridge) = setup();

    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::UpdateFeeParams {
            min_bridge_fee: Some(Uint128::new(250)),
            fee_collector: Some("terra1newcollector".to_string()),
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::SetTransport {
            address: "terra1newtransport".to_string(),
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::SetMarketplace {
            address: "terra1newmarket".to_string(),
        },
        &[],
    )
    .unwrap();

    let config: ConfigResponse = app
        .wrap()
        .query_wasm_smart(&bridge, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.min_bridge_fee, Uint128::new(250));
    assert_eq!(config.fee_collector, Addr::unchecked("terra1newcollector"));
    assert_eq!(config.transport, Addr::unchecked("terra1newtransport"));
    assert_eq!(config.marketplace, Addr::unchecked("terra1newmarket"));
    assert_eq!(config.this_chain, chain_tag(1));
}

#[test]
fn test_pause_requires_admin() {
    let (mut app, bridge) = setup();

    let err = app
        .execute_contract(Addr::unchecked(STRANGER), bridge, &ExecuteMsg::Pause {}, &[])
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Unauthorized
    );
}

// ============================================================================
// Admin Handover
// ============================================================================

#[test]
fn test_admin_handover_timelock() {
    let (mut app, bridge) = setup();

    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::ProposeAdmin {
            new_admin: STRANGER.to_string(),
        },
        &[],
    )
    .unwrap();

    let pending: PendingAdminResponse = app
        .wrap()
        .query_wasm_smart(&bridge, &QueryMsg::PendingAdmin {})
        .unwrap();
    assert_eq!(pending.new_admin, Some(Addr::unchecked(STRANGER)));

    // Too early
    let err = app
        .execute_contract(
            Addr::unchecked(STRANGER),
            bridge.clone(),
            &ExecuteMsg::AcceptAdmin {},
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::TimelockNotExpired { .. }
    ));

    // Wrong acceptor
    let err = app
        .execute_contract(
            Addr::unchecked(ADMIN),
            bridge.clone(),
            &ExecuteMsg::AcceptAdmin {},
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::UnauthorizedPendingAdmin
    );

    app.update_block(|block| {
        block.time = block.time.plus_seconds(TIMELOCK + 1);
        block.height += 1;
    });

    app.execute_contract(
        Addr::unchecked(STRANGER),
        bridge.clone(),
        &ExecuteMsg::AcceptAdmin {},
        &[],
    )
    .unwrap();

    let config: ConfigResponse = app
        .wrap()
        .query_wasm_smart(&bridge, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.admin, Addr::unchecked(STRANGER));

    let pending: PendingAdminResponse = app
        .wrap()
        .query_wasm_smart(&bridge, &QueryMsg::PendingAdmin {})
        .unwrap();
    assert_eq!(pending.new_admin, None);
}

#[test]
fn test_cancel_admin_proposal() {
    let (mut app, bridge) = setup();

    let err = app
        .execute_contract(
            Addr::unchecked(ADMIN),
            bridge.clone(),
            &ExecuteMsg::CancelAdminProposal {},
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::NoPendingAdmin
    );

    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::ProposeAdmin {
            new_admin: STRANGER.to_string(),
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked(ADMIN),
        bridge.clone(),
        &ExecuteMsg::CancelAdminProposal {},
        &[],
    )
    .unwrap();

    let pending: PendingAdminResponse = app
        .wrap()
        .query_wasm_smart(&bridge, &QueryMsg::PendingAdmin {})
        .unwrap();
    assert_eq!(pending.new_admin, None);
}
