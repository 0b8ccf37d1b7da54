//! Execute message handlers.

mod admin;
mod bridge;
mod inbound;
mod registry;

pub use admin::{
    execute_accept_admin, execute_add_authorized_caller, execute_cancel_admin_proposal,
    execute_pause, execute_propose_admin, execute_register_chain,
    execute_remove_authorized_caller, execute_set_marketplace, execute_set_transport,
    execute_unpause, execute_unregister_chain, execute_update_chain, execute_update_fee_params,
};
pub use bridge::execute_initiate_bridge;
pub use inbound::{execute_deliver, execute_retry_message};
pub use registry::{
    execute_lock_asset, execute_mark_asset_verified, execute_queue_message,
    execute_register_asset, execute_unlock_asset, execute_update_sync,
};
