//! Deterministic ECDSA over secp256k1 with recoverable public keys
//!
//! This library implements the signing core for chain-specific wallets:
//! key-pair generation, RFC 6979 deterministic signatures in canonical
//! low-S form, and public-key recovery from the 65-byte
//! `r || s || recovery_id` signature format.
//!
//! The curve arithmetic is self-contained `BigUint` algebra over the fixed
//! secp256k1 domain; there is no multi-curve abstraction and no fallback
//! curve.
//!
//! # Example
//!
//! ```rust
//! use clavis_secp256k1::{KeyPair, recover_public_key, sign};
//! use sha2::{Digest, Sha256};
//!
//! let pair = KeyPair::generate().unwrap();
//! let digest = Sha256::digest(b"payload to sign");
//!
//! let signature = sign(&digest, &pair.secret_hex()).unwrap();
//! let recovered = recover_public_key(&digest, &signature).unwrap();
//! assert_eq!(&recovered, pair.public_key_uncompressed());
//! ```

#![warn(missing_docs)]

pub mod curve;
pub mod ecdsa;
mod nonce;

pub use curve::{CurveParams, FIELD_SIZE, Point, curve};
pub use ecdsa::{
    EcdsaError, KeyPair, SIGNATURE_SIZE, Signature, derive_public_key, recover_public_key, sign,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
