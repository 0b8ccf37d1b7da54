//! Wire message codec.
//!
//! Outbound bridge messages are a tagged enum serialized to JSON; inbound
//! payloads are decoded and dispatched exhaustively in the inbound
//! processor. Payloads are deduplicated by their keccak256 hash, computed
//! over the raw bytes as delivered.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, Uint128};

use crate::error::ContractError;
use crate::identity::keccak256;

/// Message kind tag, recorded in queue bookkeeping.
#[cw_serde]
pub enum MessageType {
    AssetTransfer,
    NonTokenTransfer,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::AssetTransfer => "asset_transfer",
            MessageType::NonTokenTransfer => "non_token_transfer",
        }
    }
}

/// A bridge message as carried over the transport.
///
/// Every variant carries the asset's origin-chain coordinates; the receiving
/// chain recomputes the asset identity from them, so the same asset resolves
/// to the same key on every chain it visits.
#[cw_serde]
pub enum BridgeMessage {
    /// Move a token asset between chains.
    AssetTransfer {
        /// Request id recorded on the sending chain (32 bytes)
        request_id: Binary,
        /// Owner to credit on the receiving chain
        owner: String,
        /// Origin chain of the asset (4-byte chain tag)
        origin_chain: Binary,
        /// Collection contract on the origin chain
        origin_contract: String,
        /// Token id within the origin collection
        token_id: u64,
        /// Collection to materialize into on first arrival
        target_contract: String,
        /// Send time on the source chain, in nanoseconds
        timestamp: u64,
    },

    /// Move a non-token asset (domain, social account, app) between chains.
    NonTokenTransfer {
        /// Request id recorded on the sending chain (32 bytes)
        request_id: Binary,
        /// Owner to credit on the receiving chain
        owner: String,
        /// Origin chain of the asset (4-byte chain tag)
        origin_chain: Binary,
        /// Marketplace contract on the origin chain
        origin_contract: String,
        /// Listing id on the sending chain
        listing_id: u64,
        /// Externally-verified string asset id
        asset_id: String,
        /// Asset category ("domain", "social_account", "app")
        asset_type: String,
        /// Marketplace to list on upon first arrival
        target_contract: String,
        /// Listing price snapshot in native currency
        price: Uint128,
        /// Send time on the source chain, in nanoseconds
        timestamp: u64,
    },
}

impl BridgeMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            BridgeMessage::AssetTransfer { .. } => MessageType::AssetTransfer,
            BridgeMessage::NonTokenTransfer { .. } => MessageType::NonTokenTransfer,
        }
    }

    /// Request id carried by the message, whichever the variant.
    pub fn request_id(&self) -> &Binary {
        match self {
            BridgeMessage::AssetTransfer { request_id, .. } => request_id,
            BridgeMessage::NonTokenTransfer { request_id, .. } => request_id,
        }
    }
}

/// Encode a message into its wire payload.
pub fn encode_message(message: &BridgeMessage) -> Result<Binary, ContractError> {
    Ok(to_json_binary(message)?)
}

/// Decode a wire payload into a message.
pub fn decode_message(payload: &Binary) -> Result<BridgeMessage, ContractError> {
    cosmwasm_std::from_json(payload).map_err(|e| ContractError::MessageDecodeFailure {
        reason: e.to_string(),
    })
}

/// Dedup key of a payload: keccak256 over the raw delivered bytes.
pub fn payload_hash(payload: &Binary) -> [u8; 32] {
    keccak256(payload.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> BridgeMessage {
        BridgeMessage::AssetTransfer {
            request_id: Binary::from([9u8; 32].to_vec()),
            owner: "terra1owner".to_string(),
            origin_chain: Binary::from(vec![0, 0, 0, 1]),
            origin_contract: "terra1collection".to_string(),
            token_id: 42,
            target_contract: "terra1wrapped".to_string(),
            timestamp: 1_700_000_000_000_000_000,
        }
    }

    #[test]
    fn test_codec_round_trip() {
        let message = sample_message();
        let payload = encode_message(&message).unwrap();
        let decoded = decode_message(&payload).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.message_type(), MessageType::AssetTransfer);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_message(&Binary::from(b"not json".to_vec())).unwrap_err();
        assert!(matches!(err, ContractError::MessageDecodeFailure { .. }));
    }

    #[test]
    fn test_payload_hash_tracks_bytes() {
        let payload = encode_message(&sample_message()).unwrap();
        assert_eq!(payload_hash(&payload), payload_hash(&payload));

        let other = encode_message(&BridgeMessage::AssetTransfer {
            request_id: Binary::from([9u8; 32].to_vec()),
            owner: "terra1owner".to_string(),
            origin_chain: Binary::from(vec![0, 0, 0, 1]),
            origin_contract: "terra1collection".to_string(),
            token_id: 43,
            target_contract: "terra1wrapped".to_string(),
            timestamp: 1_700_000_000_000_000_000,
        })
        .unwrap();
        assert_ne!(payload_hash(&payload), payload_hash(&other));
    }
}
