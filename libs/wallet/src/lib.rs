//! Chain-specific, checksum-protected wallet addresses
//!
//! Turns secp256k1 key material into textual addresses for Bitcoin, Tron,
//! and Filecoin, plus WIF private key export for Bitcoin. The rendering
//! pipelines share one base58check codec; Filecoin uses an analogous
//! base32 rendering with its own BLAKE2b checksum rule.
//!
//! # Example
//!
//! ```rust
//! use clavis_wallet::{Chain, Network, Wallet};
//!
//! let wallet = Wallet::from_secret_hex(
//!     Chain::Bitcoin(Network::Mainnet),
//!     "18e14a7b6a307f426a94f8114701e7c8e774e7f9a47e2c2035db29a206321725",
//! )
//! .unwrap();
//! assert_eq!(wallet.address(), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
//! ```

#![warn(missing_docs)]

pub mod base58;
pub mod btc;
pub mod fil;
pub mod trx;
pub mod wallet;

pub use base58::Base58Error;
pub use wallet::{Chain, Network, Wallet, WalletError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
