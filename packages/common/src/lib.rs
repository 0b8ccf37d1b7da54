//! Common - Shared Types and Interfaces for NovaMarket Bridge Contracts
//!
//! This package provides the typed interfaces the bridge contract uses to
//! talk to its external collaborators: the message transport, the
//! marketplace bookkeeping contract, and wrapped asset collections.

pub mod market;
pub mod transport;

pub use market::{CollectionExecuteMsg, ListingResponse, MarketExecuteMsg, MarketQueryMsg};
pub use transport::{FeeEstimateResponse, TransportExecuteMsg, TransportQueryMsg};
