//! Message transport interface.
//!
//! The transport is an external contract providing at-least-once delivery of
//! opaque payloads between chains. It exposes a fee quote and a
//! fire-and-forget send, and invokes the bridge's `Deliver` entry point once
//! per delivered message per endpoint. Delivery order is not guaranteed.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

/// Execute interface of the transport contract.
#[cw_serde]
pub enum TransportExecuteMsg {
    /// Submit a payload for delivery to an endpoint on the target chain.
    ///
    /// The native delivery fee is attached as funds; the transport refunds
    /// any overpayment to `refund`. Once accepted, a send cannot be
    /// withdrawn.
    Send {
        /// Target chain (4-byte registered chain tag)
        target_chain: Binary,
        /// Endpoint address on the target chain (raw bytes)
        target_endpoint: Binary,
        /// Opaque payload to deliver
        payload: Binary,
        /// Address refunded any fee overpayment
        refund: String,
        /// Alternate fee token payer (unused by the bridge, always None)
        alt_payment: Option<String>,
        /// Transport-specific delivery parameters
        adapter_params: Binary,
    },
}

/// Query interface of the transport contract.
#[cw_serde]
pub enum TransportQueryMsg {
    /// Quote the delivery fee for a payload.
    EstimateFee {
        /// Target chain (4-byte registered chain tag)
        target_chain: Binary,
        /// Sender endpoint on this chain
        sender: String,
        /// Payload the quote is for
        payload: Binary,
        /// Quote in the transport's alternate token instead of native
        use_alt_token: bool,
        /// Transport-specific delivery parameters
        adapter_params: Binary,
    },
}

/// Response to [`TransportQueryMsg::EstimateFee`].
#[cw_serde]
pub struct FeeEstimateResponse {
    /// Fee in the native currency
    pub native_fee: Uint128,
    /// Fee in the transport's alternate token
    pub alt_fee: Uint128,
}
