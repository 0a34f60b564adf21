//! ECDSA key pairs, deterministic signing, and public key recovery
//!
//! Signatures are 65 bytes: `r || s || recovery_id`, with `s` normalized to
//! the lower half of the group order (canonical low-S form) and the
//! recovery id chosen so that the public key can be reconstructed from the
//! signature and message alone.
//!
//! The `message` argument everywhere is the digest being signed. Its bytes
//! are interpreted directly as the integer `e` (leftmost 256 bits); hashing
//! the payload down to a digest is the caller's concern.

use crate::curve::{FIELD_SIZE, Point, curve, to_fixed_bytes};
use crate::nonce::{NonceGenerator, bits2int};
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

/// ECDSA errors
#[derive(Error, Debug)]
pub enum EcdsaError {
    /// Attempted to sign or recover over an empty message
    #[error("Cannot sign empty message")]
    EmptyMessage,

    /// Private key is not exactly 32 bytes
    #[error("Invalid private key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Private key hex string could not be decoded
    #[error("Invalid private key hex: {0}")]
    InvalidHex(String),

    /// Private key scalar outside the valid range
    #[error("Invalid private key: {0}")]
    InvalidSecretKey(String),

    /// Random key generation failure
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Recovery id outside {0, 1, 2, 3}
    #[error("Invalid recovery id: {id}")]
    InvalidRecoveryId {
        /// The rejected recovery id
        id: u8,
    },

    /// No recovery candidate reproduced the known public key. This is an
    /// internal invariant violation, not a caller mistake: every signature
    /// produced here must admit recovery.
    #[error("Public key recovery failed")]
    RecoveryFailure,

    /// Signature blob has the wrong length
    #[error("Invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength {
        /// Expected signature length in bytes
        expected: usize,
        /// Actual signature length in bytes
        actual: usize,
    },
}

/// Result type for ECDSA operations
pub type Result<T> = std::result::Result<T, EcdsaError>;

/// Size of an encoded signature: `r || s || recovery_id`
pub const SIGNATURE_SIZE: usize = 2 * FIELD_SIZE + 1;

const HEX_PREFIX: &str = "0x";
const HEX_SECRET_LEN: usize = 2 * FIELD_SIZE;

/// A secp256k1 key pair. The public point is kept in both SEC1 encodings.
#[derive(Clone, Debug)]
pub struct KeyPair {
    secret: [u8; FIELD_SIZE],
    uncompressed: [u8; 65],
    compressed: [u8; 33],
}

impl KeyPair {
    /// Private scalar size in bytes
    pub const SECRET_SIZE: usize = FIELD_SIZE;

    /// Generate a key pair from a uniformly random scalar in `[1, n-1]`.
    pub fn generate() -> Result<Self> {
        let c = curve();
        loop {
            let mut secret = [0u8; FIELD_SIZE];
            getrandom::fill(&mut secret)
                .map_err(|e| EcdsaError::KeyGeneration(format!("random generation failed: {e}")))?;
            let d = BigUint::from_bytes_be(&secret);
            // Resample rather than reduce: reduction would bias the scalar
            if d.is_zero() || d >= c.n {
                continue;
            }
            debug!("generated secp256k1 key pair");
            return Ok(Self::from_scalar(&d));
        }
    }

    /// Build a key pair from a 32-byte private scalar.
    ///
    /// Scalars at or above the group order are reduced modulo `n`; a zero
    /// scalar is rejected.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SECRET_SIZE {
            return Err(EcdsaError::InvalidKeyLength {
                expected: Self::SECRET_SIZE,
                actual: bytes.len(),
            });
        }
        let d = BigUint::from_bytes_be(bytes) % &curve().n;
        if d.is_zero() {
            return Err(EcdsaError::InvalidSecretKey(
                "scalar is zero modulo the group order".to_string(),
            ));
        }
        Ok(Self::from_scalar(&d))
    }

    /// Build a key pair from a hex private key (64 digits, optional `0x`
    /// prefix, case insensitive).
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self> {
        let bytes = parse_secret_hex(secret_hex)?;
        Self::from_secret_bytes(&bytes)
    }

    fn from_scalar(d: &BigUint) -> Self {
        let c = curve();
        let q = c.mul_base(d);
        let uncompressed: [u8; 65] = c
            .encode_point(&q, false)
            .try_into()
            .expect("uncompressed SEC1 encoding is 65 bytes");
        let compressed: [u8; 33] = c
            .encode_point(&q, true)
            .try_into()
            .expect("compressed SEC1 encoding is 33 bytes");
        Self {
            secret: to_fixed_bytes(d),
            uncompressed,
            compressed,
        }
    }

    /// Private scalar, 32-byte big-endian
    #[must_use]
    pub fn secret_bytes(&self) -> &[u8; FIELD_SIZE] {
        &self.secret
    }

    /// Private scalar as lowercase hex
    #[must_use]
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret)
    }

    /// SEC1 `04 || x || y` public key encoding
    #[must_use]
    pub fn public_key_uncompressed(&self) -> &[u8; 65] {
        &self.uncompressed
    }

    /// SEC1 `02/03 || x` public key encoding
    #[must_use]
    pub fn public_key_compressed(&self) -> &[u8; 33] {
        &self.compressed
    }

    /// Public key in the requested encoding
    #[must_use]
    pub fn public_key(&self, compressed: bool) -> &[u8] {
        if compressed {
            &self.compressed
        } else {
            &self.uncompressed
        }
    }
}

/// An ECDSA signature with recoverable public key identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    r: [u8; FIELD_SIZE],
    s: [u8; FIELD_SIZE],
    recovery_id: u8,
}

impl Signature {
    /// Encoded size in bytes
    pub const SIZE: usize = SIGNATURE_SIZE;

    /// Assemble a signature from its components.
    pub fn new(r: [u8; FIELD_SIZE], s: [u8; FIELD_SIZE], recovery_id: u8) -> Result<Self> {
        if recovery_id > 3 {
            return Err(EcdsaError::InvalidRecoveryId { id: recovery_id });
        }
        Ok(Self { r, s, recovery_id })
    }

    /// Parse the 65-byte `r || s || recovery_id` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(EcdsaError::InvalidSignatureLength {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        let mut r = [0u8; FIELD_SIZE];
        let mut s = [0u8; FIELD_SIZE];
        r.copy_from_slice(&bytes[..FIELD_SIZE]);
        s.copy_from_slice(&bytes[FIELD_SIZE..2 * FIELD_SIZE]);
        Self::new(r, s, bytes[2 * FIELD_SIZE])
    }

    /// Parse the hex form of [`Signature::to_bytes`].
    pub fn from_hex(signature_hex: &str) -> Result<Self> {
        let bytes = hex::decode(signature_hex)
            .map_err(|e| EcdsaError::InvalidHex(format!("signature: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// `r` component, 32-byte big-endian
    #[must_use]
    pub fn r(&self) -> &[u8; FIELD_SIZE] {
        &self.r
    }

    /// `s` component, 32-byte big-endian, always in low-S form
    #[must_use]
    pub fn s(&self) -> &[u8; FIELD_SIZE] {
        &self.s
    }

    /// Recovery id in {0, 1, 2, 3}
    #[must_use]
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Chain-style `v` byte: recovery id offset by 27.
    #[must_use]
    pub fn v(&self) -> u8 {
        self.recovery_id + 27
    }

    /// `r || s || recovery_id`
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..FIELD_SIZE].copy_from_slice(&self.r);
        out[FIELD_SIZE..2 * FIELD_SIZE].copy_from_slice(&self.s);
        out[2 * FIELD_SIZE] = self.recovery_id;
        out
    }

    /// Lowercase hex of [`Signature::to_bytes`]
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Derive the public key for a hex private key in the requested encoding.
pub fn derive_public_key(secret_hex: &str, compressed: bool) -> Result<Vec<u8>> {
    let pair = KeyPair::from_secret_hex(secret_hex)?;
    Ok(pair.public_key(compressed).to_vec())
}

/// Sign a message digest with a hex private key.
///
/// The nonce is derived deterministically (RFC 6979), `s` is normalized to
/// low-S form, and the recovery id is found by searching candidates 0-3
/// against the signer's own public key.
pub fn sign(message: &[u8], secret_hex: &str) -> Result<Signature> {
    if message.is_empty() {
        return Err(EcdsaError::EmptyMessage);
    }
    let pair = KeyPair::from_secret_hex(secret_hex)?;

    let c = curve();
    let d = BigUint::from_bytes_be(&pair.secret);
    let e = bits2int(message);
    let mut nonces = NonceGenerator::new(&pair.secret, message);

    loop {
        let k = nonces.next();
        let Point::Affine { x, .. } = c.mul_base(&k) else {
            continue;
        };
        let r = x % &c.n;
        if r.is_zero() {
            continue;
        }
        let s = (c.scalar_inv(&k) * (&e + &r * &d)) % &c.n;
        if s.is_zero() {
            continue;
        }
        // Canonical low-S form: of the two valid solutions keep the smaller
        let s = if s > c.half_n { &c.n - s } else { s };

        let recovery_id = find_recovery_id(&r, &s, &e, &pair.uncompressed)?;
        return Signature::new(to_fixed_bytes(&r), to_fixed_bytes(&s), recovery_id);
    }
}

/// Recover the uncompressed public key from a signature and the message it
/// signs, using the signature's stored recovery id.
pub fn recover_public_key(message: &[u8], signature: &Signature) -> Result<[u8; 65]> {
    if message.is_empty() {
        return Err(EcdsaError::EmptyMessage);
    }
    let r = BigUint::from_bytes_be(&signature.r);
    let s = BigUint::from_bytes_be(&signature.s);
    let e = bits2int(message);
    recover_candidate(signature.recovery_id, &r, &s, &e).ok_or(EcdsaError::RecoveryFailure)
}

/// Search recovery id candidates 0-3 for the one that reproduces the known
/// public key. Candidates 2-3 cover `r` values that overflowed past `n`;
/// with secp256k1's tiny `p - n` gap they are astronomically rare, but
/// dropping them would turn those rare signatures into silent failures.
fn find_recovery_id(r: &BigUint, s: &BigUint, e: &BigUint, expected: &[u8; 65]) -> Result<u8> {
    for id in 0u8..4 {
        if let Some(candidate) = recover_candidate(id, r, s, e) {
            if candidate == *expected {
                debug!("recovery id search matched candidate {id}");
                return Ok(id);
            }
        }
    }
    Err(EcdsaError::RecoveryFailure)
}

/// One recovery attempt: rebuild `R` from `r` and the candidate id, then
/// compute `Q = r^-1 (s R - e G)` with a combined double-scalar multiply.
fn recover_candidate(id: u8, r: &BigUint, s: &BigUint, e: &BigUint) -> Option<[u8; 65]> {
    let c = curve();
    let x = r + BigUint::from(id >> 1) * &c.n;
    // decompress rejects x >= p and x with no curve point
    let point_r = c.decompress(&x, id & 1 == 1)?;
    if !c.mul(&c.n, &point_r).is_infinity() {
        return None;
    }

    let e_neg = (&c.n - (e % &c.n)) % &c.n;
    let r_inv = c.scalar_inv(r);
    let sr_inv = (s * &r_inv) % &c.n;
    let er_inv = (&e_neg * &r_inv) % &c.n;
    let q = c.linear_combination(&er_inv, &c.g, &sr_inv, &point_r);
    if q.is_infinity() {
        return None;
    }
    c.encode_point(&q, false).try_into().ok()
}

fn parse_secret_hex(secret_hex: &str) -> Result<[u8; FIELD_SIZE]> {
    let trimmed = secret_hex
        .strip_prefix(HEX_PREFIX)
        .unwrap_or(secret_hex);
    if trimmed.len() != HEX_SECRET_LEN {
        return Err(EcdsaError::InvalidKeyLength {
            expected: KeyPair::SECRET_SIZE,
            actual: trimmed.len() / 2,
        });
    }
    let bytes = hex::decode(trimmed).map_err(|e| EcdsaError::InvalidHex(e.to_string()))?;
    let mut out = [0u8; FIELD_SIZE];
    out.copy_from_slice(&bytes);
    Ok(out)
}
