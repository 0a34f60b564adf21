//! Tron address derivation and reversal
//!
//! A Tron address is `0x41` followed by the last 20 bytes of the
//! Keccak-256 of the raw 64-byte public key (the SEC1 point without its
//! `0x04` marker), rendered with checksum-append base58. The reversal
//! helpers take a rendered address back to its payload bytes.

use crate::base58;
use crate::wallet::WalletError;
use sha3::{Digest, Keccak256};

/// Address prefix byte
pub const ADDRESS_PREFIX: u8 = 0x41;
/// Decoded address length: prefix + 20-byte hash + 4-byte checksum
const DECODED_LEN: usize = 25;

/// Derive the address payload (`0x41 || keccak[12..]`) from the raw
/// 64-byte public key.
#[must_use]
pub fn address_payload(public_key_raw: &[u8; 64]) -> [u8; 21] {
    let digest = Keccak256::digest(public_key_raw);
    let mut payload = [0u8; 21];
    payload[0] = ADDRESS_PREFIX;
    payload[1..].copy_from_slice(&digest[digest.len() - 20..]);
    payload
}

/// Derive the base58check address from the raw 64-byte public key.
#[must_use]
pub fn address(public_key_raw: &[u8; 64]) -> String {
    base58::encode_check(&address_payload(public_key_raw))
}

/// Derive the address straight from a hex private key.
pub fn address_from_secret_hex(secret_hex: &str) -> Result<String, WalletError> {
    let uncompressed = clavis_secp256k1::derive_public_key(secret_hex, false)?;
    let mut raw = [0u8; 64];
    raw.copy_from_slice(&uncompressed[1..]);
    Ok(address(&raw))
}

/// Recover the 20-byte hash payload from a rendered address, without the
/// prefix byte, as lowercase hex.
pub fn payload_from_address(address: &str) -> Result<String, WalletError> {
    let bytes = decode_address(address)?;
    Ok(hex::encode(&bytes[1..]))
}

/// Recover the prefix byte plus 20-byte hash payload from a rendered
/// address, as lowercase hex.
pub fn payload_with_prefix(address: &str) -> Result<String, WalletError> {
    let bytes = decode_address(address)?;
    Ok(hex::encode(&bytes))
}

/// Decode and checksum-verify an address, enforcing the exact raw length.
fn decode_address(address: &str) -> Result<[u8; 21], WalletError> {
    let raw = base58::decode(address)?;
    if raw.len() != DECODED_LEN {
        return Err(WalletError::AddressFormat {
            expected: DECODED_LEN,
            actual: raw.len(),
        });
    }
    let payload = base58::decode_check(address)?;
    let mut out = [0u8; 21];
    out.copy_from_slice(&payload);
    Ok(out)
}
