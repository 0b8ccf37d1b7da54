//! Asset identity and request id derivation.
//!
//! An asset observed on any chain maps to one deterministic 32-byte
//! identity: the keccak256 hash of a fixed 32-byte-slot layout over the
//! asset's origin coordinates. The origin chain tag is part of the preimage,
//! so assets from different chains can never collide, and every chain an
//! asset visits derives the same key from the same coordinates.
//!
//! # Identity preimage layout (128 bytes)
//! - Bytes 0-31:    origin chain tag (4 bytes, left-padded)
//! - Bytes 32-63:   keccak256 of the origin contract reference
//! - Bytes 64-95:   token/listing id (u64, left-padded) for token assets,
//!                  keccak256 of the string asset id for non-token assets
//! - Bytes 96-127:  asset kind discriminant (left-padded)

use cosmwasm_std::Binary;
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;

/// Kind discriminant for token assets in the identity preimage.
const KIND_TOKEN: u8 = 1;

/// Kind discriminant for non-token assets in the identity preimage.
const KIND_NON_TOKEN: u8 = 2;

/// The per-kind lookup key of an asset on its origin chain.
pub enum AssetKey<'a> {
    /// NFT or marketplace-internal numeric id
    Token(u64),
    /// Externally-verified string asset id (domain, social account, app)
    NonToken(&'a str),
}

/// Compute keccak256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Derive the deterministic cross-chain identity of an asset.
///
/// Same inputs always produce the same identity; the chain tag in the
/// preimage keeps identities from different chains disjoint.
pub fn compute_asset_identity(
    origin_chain: &[u8; 4],
    contract_ref: &str,
    key: &AssetKey,
) -> [u8; 32] {
    let mut data = [0u8; 128];

    // Chain tag, left-padded into the first slot
    data[28..32].copy_from_slice(origin_chain);

    // Contract reference, hashed to a fixed width
    data[32..64].copy_from_slice(&keccak256(contract_ref.as_bytes()));

    // Asset key slot and kind discriminant
    match key {
        AssetKey::Token(id) => {
            data[64 + 24..96].copy_from_slice(&id.to_be_bytes());
            data[127] = KIND_TOKEN;
        }
        AssetKey::NonToken(asset_id) => {
            data[64..96].copy_from_slice(&keccak256(asset_id.as_bytes()));
            data[127] = KIND_NON_TOKEN;
        }
    }

    keccak256(&data)
}

/// Derive a bridge request id.
///
/// The timestamp is in the preimage so concurrent requests from the same
/// owner for different assets or moments never collide.
///
/// # Preimage layout (160 bytes)
/// - Bytes 0-31:    keccak256 of the owner address
/// - Bytes 32-63:   keccak256 of the origin contract reference
/// - Bytes 64-95:   token/listing id or keccak256 of the string asset id
/// - Bytes 96-127:  target chain tag (4 bytes, left-padded)
/// - Bytes 128-159: timestamp in nanoseconds (u64, left-padded)
pub fn derive_request_id(
    owner: &str,
    contract_ref: &str,
    key: &AssetKey,
    target_chain: &[u8; 4],
    timestamp_nanos: u64,
) -> [u8; 32] {
    let mut data = [0u8; 160];

    data[0..32].copy_from_slice(&keccak256(owner.as_bytes()));
    data[32..64].copy_from_slice(&keccak256(contract_ref.as_bytes()));

    match key {
        AssetKey::Token(id) => {
            data[64 + 24..96].copy_from_slice(&id.to_be_bytes());
        }
        AssetKey::NonToken(asset_id) => {
            data[64..96].copy_from_slice(&keccak256(asset_id.as_bytes()));
        }
    }

    data[96 + 28..128].copy_from_slice(target_chain);
    data[128 + 24..160].copy_from_slice(&timestamp_nanos.to_be_bytes());

    keccak256(&data)
}

/// Convert a 32-byte hash to a 0x-prefixed hex string (for attributes).
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Convert a 4-byte chain tag to a 0x-prefixed hex string.
pub fn chain_tag_to_hex(tag: &[u8; 4]) -> String {
    format!("0x{}", hex::encode(tag))
}

/// Parse a 4-byte chain tag from Binary input.
pub fn parse_chain_tag(tag: &Binary) -> Result<[u8; 4], ContractError> {
    tag.to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidChainTag { got: tag.len() })
}

/// Parse a 32-byte hash from Binary input.
pub fn parse_hash32(hash: &Binary) -> Result<[u8; 32], ContractError> {
    hash.to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: hash.len() })
}
