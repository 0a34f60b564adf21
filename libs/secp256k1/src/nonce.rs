//! Deterministic nonce derivation (RFC 6979, HMAC-SHA-256)
//!
//! Signing the same message with the same key must always produce the same
//! `k`, which removes the nonce-reuse key-leakage hazard of random-nonce
//! ECDSA. The generator is stateful so the degenerate `r = 0` / `s = 0`
//! cases can pull further candidates from the same HMAC chain.

use crate::curve::{FIELD_SIZE, curve};
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Leftmost `qlen` bits of a byte string as an integer (RFC 6979 `bits2int`
/// with `qlen = 256`).
pub(crate) fn bits2int(bytes: &[u8]) -> BigUint {
    let value = BigUint::from_bytes_be(bytes);
    let blen = 8 * bytes.len() as u64;
    let qlen = 8 * FIELD_SIZE as u64;
    if blen > qlen {
        value >> (blen - qlen)
    } else {
        value
    }
}

/// RFC 6979 `int2octets`: fixed 32-byte big-endian form of a scalar.
fn int2octets(value: &BigUint) -> [u8; FIELD_SIZE] {
    crate::curve::to_fixed_bytes(value)
}

/// RFC 6979 `bits2octets`: truncate, reduce mod `n`, re-serialize.
fn bits2octets(bytes: &[u8]) -> [u8; FIELD_SIZE] {
    let reduced = bits2int(bytes) % &curve().n;
    int2octets(&reduced)
}

fn hmac(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Stateful RFC 6979 nonce generator for one (key, message) pair.
pub(crate) struct NonceGenerator {
    key: [u8; 32],
    v: [u8; 32],
    exhausted_first: bool,
}

impl NonceGenerator {
    /// Seed the HMAC chain from the private scalar and the message digest.
    pub(crate) fn new(secret: &[u8; FIELD_SIZE], message: &[u8]) -> Self {
        let d = int2octets(&BigUint::from_bytes_be(secret));
        let h1 = bits2octets(message);

        let v = [0x01u8; 32];
        let key = [0x00u8; 32];
        let key = hmac(&key, &[&v, &[0x00], &d, &h1]);
        let v = hmac(&key, &[&v]);
        let key = hmac(&key, &[&v, &[0x01], &d, &h1]);
        let v = hmac(&key, &[&v]);

        Self {
            key,
            v,
            exhausted_first: false,
        }
    }

    /// Next candidate nonce in `[1, n-1]`. Out-of-range candidates and
    /// caller-rejected ones both advance the chain the same way.
    pub(crate) fn next(&mut self) -> BigUint {
        let n = &curve().n;
        if self.exhausted_first {
            self.retry();
        }
        loop {
            self.v = hmac(&self.key, &[&self.v]);
            let k = bits2int(&self.v);
            if !k.is_zero() && k < *n {
                self.exhausted_first = true;
                return k;
            }
            self.retry();
        }
    }

    fn retry(&mut self) {
        self.key = hmac(&self.key, &[&self.v, &[0x00]]);
        self.v = hmac(&self.key, &[&self.v]);
    }
}
