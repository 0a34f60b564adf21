//! Bitcoin address and WIF derivation
//!
//! Addresses are hash160 (SHA-256 then RIPEMD-160) of the SEC1 public key,
//! version-prefixed and base58check encoded. One private key yields two
//! addresses, one per public key encoding; both are individually stable.

use crate::base58;
use crate::wallet::Network;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Address version byte, mainnet
const VERSION_MAINNET: u8 = 0x00;
/// Address version byte, testnet
const VERSION_TESTNET: u8 = 0x6f;
/// WIF prefix byte, mainnet
const WIF_MAINNET: u8 = 0x80;
/// WIF prefix byte, testnet
const WIF_TESTNET: u8 = 0xef;
/// WIF suffix marking a compressed public key
const WIF_COMPRESSED_SUFFIX: u8 = 0x01;

/// hash160: RIPEMD-160 over SHA-256 of the SEC1-encoded public key.
#[must_use]
pub fn hash160(public_key: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(public_key);
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(sha));
    out
}

/// Derive the P2PKH address for a SEC1-encoded public key.
#[must_use]
pub fn address(public_key: &[u8], network: Network) -> String {
    let version = match network {
        Network::Mainnet => VERSION_MAINNET,
        Network::Testnet => VERSION_TESTNET,
    };
    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(&hash160(public_key));
    base58::encode_check(&payload)
}

/// Encode a private key in wallet import format.
///
/// The compressed variant differs from the uncompressed one by a trailing
/// `0x01` byte inside the checksummed payload.
#[must_use]
pub fn wif(secret: &[u8; 32], network: Network, compressed: bool) -> String {
    let prefix = match network {
        Network::Mainnet => WIF_MAINNET,
        Network::Testnet => WIF_TESTNET,
    };
    let mut payload = Vec::with_capacity(34);
    payload.push(prefix);
    payload.extend_from_slice(secret);
    if compressed {
        payload.push(WIF_COMPRESSED_SUFFIX);
    }
    base58::encode_check(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clavis_secp256k1::derive_public_key;

    const HASH160_KEY: &str = "18e14a7b6a307f426a94f8114701e7c8e774e7f9a47e2c2035db29a206321725";
    const WIF_KEY: &str = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

    #[test]
    fn hash160_known_vector() {
        let public_key = derive_public_key(HASH160_KEY, false).unwrap();
        assert_eq!(
            hex::encode(hash160(&public_key)),
            "010966776006953d5567439e5e39f86a0d273bee"
        );
    }

    #[test]
    fn mainnet_address_known_vector() {
        let public_key = derive_public_key(HASH160_KEY, false).unwrap();
        assert_eq!(
            address(&public_key, Network::Mainnet),
            "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM"
        );
    }

    #[test]
    fn wif_known_vectors() {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&hex::decode(WIF_KEY).unwrap());
        assert_eq!(
            wif(&secret, Network::Mainnet, false),
            "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ"
        );
        assert_eq!(
            wif(&secret, Network::Mainnet, true),
            "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617"
        );
    }

    #[test]
    fn compressed_and_uncompressed_addresses_differ() {
        let uncompressed = derive_public_key(HASH160_KEY, false).unwrap();
        let compressed = derive_public_key(HASH160_KEY, true).unwrap();
        assert_ne!(
            address(&uncompressed, Network::Mainnet),
            address(&compressed, Network::Mainnet)
        );
    }

    #[test]
    fn testnet_addresses_use_their_own_version_byte() {
        let public_key = derive_public_key(HASH160_KEY, false).unwrap();
        let mainnet = address(&public_key, Network::Mainnet);
        let testnet = address(&public_key, Network::Testnet);
        assert_ne!(mainnet, testnet);
        assert!(mainnet.starts_with('1'));
        // 0x6f payloads render with an m or n prefix
        assert!(testnet.starts_with('m') || testnet.starts_with('n'));
    }

    #[test]
    fn address_decodes_back_to_hash160() {
        let public_key = derive_public_key(HASH160_KEY, true).unwrap();
        let encoded = address(&public_key, Network::Mainnet);
        let payload = crate::base58::decode_check(&encoded).unwrap();
        assert_eq!(payload.len(), 21);
        assert_eq!(payload[0], 0x00);
        assert_eq!(payload[1..], hash160(&public_key));
    }
}
