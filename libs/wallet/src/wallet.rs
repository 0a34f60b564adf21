//! Chain-tagged wallets with lazily cached derivations
//!
//! One [`Wallet`] type covers every supported chain; the chain tag picks
//! the hash pipeline, prefix bytes, and rendering. Key material is
//! immutable for the wallet's lifetime, so every derivation is a pure
//! function of it and caching is a plain compute-once slot per
//! compressed/uncompressed variant.

use crate::base58::Base58Error;
use crate::{btc, fil, trx};
use clavis_secp256k1::{EcdsaError, KeyPair};
use log::debug;
use std::sync::OnceLock;
use thiserror::Error;

/// Wallet errors
#[derive(Error, Debug)]
pub enum WalletError {
    /// Base58 codec failure
    #[error("Base58 error: {0}")]
    Base58(#[from] Base58Error),

    /// Key material failure
    #[error("Key error: {0}")]
    Ecdsa(#[from] EcdsaError),

    /// Decoded address has an unexpected total length for its chain
    #[error("Invalid address: expected {expected} decoded bytes, got {actual}")]
    AddressFormat {
        /// Expected decoded length in bytes
        expected: usize,
        /// Actual decoded length in bytes
        actual: usize,
    },

    /// WIF export requested for a chain without a WIF convention
    #[error("WIF private keys are only defined for Bitcoin wallets")]
    WifUnsupported,
}

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Network selector for chains that distinguish main and test networks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Production network
    Mainnet,
    /// Test network
    Testnet,
}

/// Supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    /// Bitcoin P2PKH addresses and WIF keys
    Bitcoin(Network),
    /// Tron base58check addresses
    Tron,
    /// Filecoin protocol-1 key addresses
    Filecoin(Network),
}

/// A key pair bound to one chain, with per-variant derivation caches.
///
/// Derivations are pure, so a racing first access would only recompute the
/// identical string; the `OnceLock` slots exist to skip even that
/// redundant work.
pub struct Wallet {
    chain: Chain,
    keys: KeyPair,
    // indexed by the "public key compressed" axis
    address: [OnceLock<String>; 2],
    wif: [OnceLock<String>; 2],
}

impl Wallet {
    /// Create a wallet over a freshly generated key pair.
    pub fn generate(chain: Chain) -> Result<Self> {
        let keys = KeyPair::generate()?;
        debug!("generated wallet for {chain:?}");
        Ok(Self::with_keys(chain, keys))
    }

    /// Create a wallet from an existing hex private key (64 digits,
    /// optional `0x` prefix).
    pub fn from_secret_hex(chain: Chain, secret_hex: &str) -> Result<Self> {
        let keys = KeyPair::from_secret_hex(secret_hex)?;
        Ok(Self::with_keys(chain, keys))
    }

    fn with_keys(chain: Chain, keys: KeyPair) -> Self {
        Self {
            chain,
            keys,
            address: [OnceLock::new(), OnceLock::new()],
            wif: [OnceLock::new(), OnceLock::new()],
        }
    }

    /// The chain this wallet derives for
    #[must_use]
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The underlying key pair
    #[must_use]
    pub fn keys(&self) -> &KeyPair {
        &self.keys
    }

    /// The default address: the uncompressed-public-key variant.
    #[must_use]
    pub fn address(&self) -> &str {
        self.address_variant(false)
    }

    /// The address for the chosen public key encoding.
    ///
    /// Only Bitcoin distinguishes the two variants; Tron and Filecoin
    /// always derive from the uncompressed key and ignore the flag.
    #[must_use]
    pub fn address_variant(&self, compressed: bool) -> &str {
        let compressed = compressed && matches!(self.chain, Chain::Bitcoin(_));
        self.address[usize::from(compressed)].get_or_init(|| self.derive_address(compressed))
    }

    fn derive_address(&self, compressed: bool) -> String {
        match self.chain {
            Chain::Bitcoin(network) => btc::address(self.keys.public_key(compressed), network),
            Chain::Tron => {
                let mut raw = [0u8; 64];
                raw.copy_from_slice(&self.keys.public_key_uncompressed()[1..]);
                trx::address(&raw)
            }
            Chain::Filecoin(network) => fil::address(self.keys.public_key_uncompressed(), network),
        }
    }

    /// Hex private key. The Bitcoin compressed variant carries the same
    /// trailing `01` marker its WIF form does.
    #[must_use]
    pub fn secret_hex(&self) -> String {
        self.secret_hex_variant(false)
    }

    /// Hex private key for the chosen public key encoding.
    #[must_use]
    pub fn secret_hex_variant(&self, compressed: bool) -> String {
        let mut out = self.keys.secret_hex();
        if compressed && matches!(self.chain, Chain::Bitcoin(_)) {
            out.push_str("01");
        }
        out
    }

    /// WIF-encoded private key (Bitcoin only).
    pub fn wif(&self, compressed: bool) -> Result<&str> {
        let Chain::Bitcoin(network) = self.chain else {
            return Err(WalletError::WifUnsupported);
        };
        Ok(self.wif[usize::from(compressed)]
            .get_or_init(|| btc::wif(self.keys.secret_bytes(), network, compressed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "18e14a7b6a307f426a94f8114701e7c8e774e7f9a47e2c2035db29a206321725";

    #[test]
    fn bitcoin_wallet_known_address() {
        let wallet = Wallet::from_secret_hex(Chain::Bitcoin(Network::Mainnet), KEY).unwrap();
        assert_eq!(wallet.address(), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
    }

    #[test]
    fn bitcoin_variants_are_distinct_and_stable() {
        let wallet = Wallet::from_secret_hex(Chain::Bitcoin(Network::Mainnet), KEY).unwrap();
        let uncompressed = wallet.address_variant(false).to_string();
        let compressed = wallet.address_variant(true).to_string();
        assert_ne!(uncompressed, compressed);
        // cached values are returned verbatim on re-access
        assert_eq!(wallet.address_variant(false), uncompressed);
        assert_eq!(wallet.address_variant(true), compressed);
    }

    #[test]
    fn bitcoin_wif_variants() {
        let key = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";
        let wallet = Wallet::from_secret_hex(Chain::Bitcoin(Network::Mainnet), key).unwrap();
        assert_eq!(
            wallet.wif(false).unwrap(),
            "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ"
        );
        assert_eq!(
            wallet.wif(true).unwrap(),
            "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617"
        );
    }

    #[test]
    fn compressed_secret_hex_gets_suffix() {
        let wallet = Wallet::from_secret_hex(Chain::Bitcoin(Network::Mainnet), KEY).unwrap();
        assert_eq!(wallet.secret_hex(), KEY);
        assert_eq!(wallet.secret_hex_variant(true), format!("{KEY}01"));

        // only Bitcoin has the marker convention
        let tron = Wallet::from_secret_hex(Chain::Tron, KEY).unwrap();
        assert_eq!(tron.secret_hex_variant(true), KEY);
    }

    #[test]
    fn wif_is_bitcoin_only() {
        let wallet = Wallet::from_secret_hex(Chain::Tron, KEY).unwrap();
        assert!(matches!(
            wallet.wif(false),
            Err(WalletError::WifUnsupported)
        ));
    }

    #[test]
    fn tron_wallet_ignores_compression_flag() {
        let wallet = Wallet::from_secret_hex(Chain::Tron, KEY).unwrap();
        assert_eq!(wallet.address_variant(false), wallet.address_variant(true));
        assert!(wallet.address().starts_with('T'));
    }

    #[test]
    fn filecoin_wallet_address_prefix_follows_network() {
        let mainnet = Wallet::from_secret_hex(Chain::Filecoin(Network::Mainnet), KEY).unwrap();
        let testnet = Wallet::from_secret_hex(Chain::Filecoin(Network::Testnet), KEY).unwrap();
        assert!(mainnet.address().starts_with("f1"));
        assert!(testnet.address().starts_with("t1"));
        assert_eq!(&mainnet.address()[1..], &testnet.address()[1..]);
    }

    #[test]
    fn generated_wallets_have_distinct_addresses() {
        let a = Wallet::generate(Chain::Tron).unwrap();
        let b = Wallet::generate(Chain::Tron).unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn same_key_same_address_across_instances() {
        let a = Wallet::from_secret_hex(Chain::Filecoin(Network::Mainnet), KEY).unwrap();
        let b = Wallet::from_secret_hex(Chain::Filecoin(Network::Mainnet), KEY).unwrap();
        assert_eq!(a.address(), b.address());
    }
}
