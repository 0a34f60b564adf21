//! Filecoin secp256k1 (protocol 1) address derivation
//!
//! The payload is a BLAKE2b-160 of the 65-byte uncompressed public key.
//! The 4-byte checksum is a BLAKE2b-32 over the protocol byte plus the
//! payload; it rides inside the base32 body rather than being appended to
//! the pre-encoding bytes. Rendering is RFC 4648 base32 without padding,
//! lower-cased, behind a `f1`/`t1` network-and-protocol prefix.

use crate::wallet::Network;
use blake2::digest::consts::{U4, U20};
use blake2::{Blake2b, Digest};
use data_encoding::BASE32_NOPAD;

type Blake2b160 = Blake2b<U20>;
type Blake2b32 = Blake2b<U4>;

/// Key-address protocol identifier (secp256k1)
pub const PROTOCOL_SECP256K1: u8 = 0x01;

/// BLAKE2b-160 of the uncompressed public key.
#[must_use]
pub fn public_key_hash(public_key_uncompressed: &[u8; 65]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Blake2b160::digest(public_key_uncompressed));
    out
}

/// BLAKE2b-32 over protocol byte plus payload.
#[must_use]
pub fn checksum(payload: &[u8; 20]) -> [u8; 4] {
    let mut hasher = Blake2b32::new();
    hasher.update([PROTOCOL_SECP256K1]);
    hasher.update(payload);
    let mut out = [0u8; 4];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Derive the protocol-1 address for an uncompressed public key.
#[must_use]
pub fn address(public_key_uncompressed: &[u8; 65], network: Network) -> String {
    let payload = public_key_hash(public_key_uncompressed);
    let mut body = Vec::with_capacity(24);
    body.extend_from_slice(&payload);
    body.extend_from_slice(&checksum(&payload));

    let prefix = match network {
        Network::Mainnet => "f",
        Network::Testnet => "t",
    };
    format!(
        "{prefix}{PROTOCOL_SECP256K1}{}",
        BASE32_NOPAD.encode(&body).to_ascii_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clavis_secp256k1::KeyPair;

    fn test_public_key() -> [u8; 65] {
        let pair = KeyPair::from_secret_hex(
            "0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        *pair.public_key_uncompressed()
    }

    #[test]
    fn address_shape() {
        let mainnet = address(&test_public_key(), Network::Mainnet);
        assert!(mainnet.starts_with("f1"));
        // f1 + base32(20 + 4 bytes) = 2 + 39 characters
        assert_eq!(mainnet.len(), 41);
        assert!(
            mainnet[2..]
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );

        let testnet = address(&test_public_key(), Network::Testnet);
        assert!(testnet.starts_with("t1"));
        assert_eq!(&mainnet[1..], &testnet[1..]);
    }

    #[test]
    fn rendered_address_decodes_and_reverifies() {
        let encoded = address(&test_public_key(), Network::Mainnet);
        let body = BASE32_NOPAD
            .decode(encoded[2..].to_ascii_uppercase().as_bytes())
            .unwrap();
        assert_eq!(body.len(), 24);

        let mut payload = [0u8; 20];
        payload.copy_from_slice(&body[..20]);
        assert_eq!(payload, public_key_hash(&test_public_key()));
        assert_eq!(body[20..], checksum(&payload));
    }

    #[test]
    fn checksum_covers_the_protocol_byte() {
        // Same payload under a different protocol byte must not verify;
        // the protocol participates in the checksum even though it is
        // rendered outside the base32 body.
        let payload = public_key_hash(&test_public_key());
        let with_protocol = checksum(&payload);

        let mut hasher = Blake2b32::new();
        hasher.update([0x00u8]);
        hasher.update(payload);
        let mut without: [u8; 4] = [0u8; 4];
        without.copy_from_slice(&hasher.finalize());

        assert_ne!(with_protocol, without);
    }

    #[test]
    fn derivation_is_deterministic() {
        let key = test_public_key();
        assert_eq!(
            address(&key, Network::Mainnet),
            address(&key, Network::Mainnet)
        );
    }
}
