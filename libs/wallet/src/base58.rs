//! Base58 and Base58Check encoding
//!
//! The codec treats the input as one big-endian unsigned integer and
//! repeatedly divides by 58. A big integer cannot distinguish `[0x00,
//! 0x01]` from `[0x01]`, so leading zero bytes are counted separately and
//! rendered as leading `'1'` characters (and restored on decode).
//!
//! The checksummed variant appends the first four bytes of a double
//! SHA-256 over the payload before encoding; decoders verify that suffix
//! before trusting the payload.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// The Bitcoin-style base58 alphabet (no `0`, `O`, `I`, `l`)
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Checksum suffix length in bytes
pub const CHECKSUM_SIZE: usize = 4;

/// Base58 codec errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Base58Error {
    /// Character outside the base58 alphabet
    #[error("Invalid character for base58: {character:?}")]
    InvalidCharacter {
        /// The offending character
        character: char,
    },

    /// Checksum suffix does not match the recomputed checksum
    #[error("Base58 checksum mismatch")]
    ChecksumMismatch,
}

/// Result type for base58 operations
pub type Result<T> = std::result::Result<T, Base58Error>;

/// Encode bytes as base58.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    let mut value = BigUint::from_bytes_be(bytes);
    let radix = BigUint::from(ALPHABET.len());
    let mut digits = Vec::new();
    while !value.is_zero() {
        let digit = (&value % &radix).to_usize().expect("remainder below 58");
        digits.push(ALPHABET[digit]);
        value /= &radix;
    }
    // One '1' per leading zero byte, lost in the integer view
    for _ in bytes.iter().take_while(|b| **b == 0) {
        digits.push(ALPHABET[0]);
    }
    digits.reverse();
    String::from_utf8(digits).expect("alphabet is ASCII")
}

/// Decode a base58 string back to bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let radix = BigUint::from(ALPHABET.len());
    let mut value = BigUint::zero();
    for character in encoded.chars() {
        let digit = ALPHABET
            .iter()
            .position(|c| char::from(*c) == character)
            .ok_or(Base58Error::InvalidCharacter { character })?;
        value = value * &radix + BigUint::from(digit);
    }

    let body = if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    };
    let leading_ones = encoded
        .bytes()
        .take_while(|b| *b == ALPHABET[0])
        .count();

    let mut bytes = vec![0u8; leading_ones];
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// First four bytes of SHA-256(SHA-256(payload)).
#[must_use]
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&second[..CHECKSUM_SIZE]);
    out
}

/// Append the checksum suffix and encode.
#[must_use]
pub fn encode_check(payload: &[u8]) -> String {
    let mut buffer = Vec::with_capacity(payload.len() + CHECKSUM_SIZE);
    buffer.extend_from_slice(payload);
    buffer.extend_from_slice(&checksum(payload));
    encode(&buffer)
}

/// Decode and verify the checksum suffix, returning the payload without it.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>> {
    let mut bytes = decode(encoded)?;
    if bytes.len() < CHECKSUM_SIZE {
        return Err(Base58Error::ChecksumMismatch);
    }
    let suffix = bytes.split_off(bytes.len() - CHECKSUM_SIZE);
    if suffix != checksum(&bytes) {
        return Err(Base58Error::ChecksumMismatch);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zeros_become_ones() {
        // {0, 0, 1}: two zero bytes, then the base58 digits of 1
        assert_eq!(encode(&[0, 0, 1]), "112");
    }

    #[test]
    fn ascii_example() {
        // "aaa" = 6381921 = 32*58^3 + 41*58^2 + 7*58 + 7
        assert_eq!(encode(b"aaa"), "Zi88");
        assert_eq!(decode("Zi88").unwrap(), b"aaa");
    }

    #[test]
    fn empty_input_roundtrip() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn all_zero_input_roundtrip() {
        assert_eq!(encode(&[0, 0, 0]), "111");
        assert_eq!(decode("111").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn known_p2pkh_payload() {
        // Classic hash160 example: version 0x00 + hash + checksum
        let payload = hex::decode("00010966776006953d5567439e5e39f86a0d273bee").unwrap();
        assert_eq!(encode_check(&payload), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
        assert_eq!(
            decode_check("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").unwrap(),
            payload
        );
    }

    #[test]
    fn invalid_character_is_rejected() {
        assert_eq!(
            decode("1O1"),
            Err(Base58Error::InvalidCharacter { character: 'O' })
        );
        assert_eq!(
            decode("ab!c").unwrap_err(),
            Base58Error::InvalidCharacter { character: '!' }
        );
    }

    #[test]
    fn corrupted_trailing_character_fails_checksum() {
        let encoded = encode_check(b"checksummed payload");
        let mut corrupted = encoded.clone();
        let last = corrupted.pop().unwrap();
        let replacement = if last == '2' { '3' } else { '2' };
        corrupted.push(replacement);
        assert_eq!(decode_check(&corrupted), Err(Base58Error::ChecksumMismatch));
    }

    #[test]
    fn too_short_for_checksum_is_rejected() {
        assert_eq!(decode_check("1"), Err(Base58Error::ChecksumMismatch));
    }

    #[test]
    fn roundtrip_with_leading_zero_checksummed() {
        let payload = [0u8, 0, 0x41, 0xff, 0x07];
        let encoded = encode_check(&payload);
        assert_eq!(decode_check(&encoded).unwrap(), payload);
    }
}
