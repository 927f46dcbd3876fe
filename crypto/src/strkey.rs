//! Strkey textual encoding for account ids (`G…`) and secret seeds (`S…`).
//!
//! Layout: `base32(version || payload(32) || crc16_xmodem(version || payload) as LE)`,
//! RFC 4648 alphabet, no padding. 35 bytes encode to exactly 56 characters.

use lodestar_types::{KeyPair, PrivateKey, PublicKey};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::keys::keypair_from_seed;

/// RFC 4648 base32 alphabet.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const PAYLOAD_LEN: usize = 32;
/// version + payload + checksum
const RAW_LEN: usize = 1 + PAYLOAD_LEN + 2;
const ENCODED_LEN: usize = 56;

/// Version bytes of the two strkey kinds this wallet handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum VersionByte {
    /// `G…`
    AccountId = 6 << 3,
    /// `S…`
    SecretSeed = 18 << 3,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrkeyError {
    #[error("invalid secret key encoding: {0}")]
    InvalidSecretEncoding(&'static str),

    #[error("invalid public key encoding: {0}")]
    InvalidPublicKey(&'static str),
}

/// CRC16-XModem (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut result = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode exactly `N` bytes. Rejects bad characters, wrong length and
/// non-zero trailing bits.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    if s.len() != (N * 8).div_ceil(5) {
        return None;
    }

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result[pos] = (buffer >> bits_in_buffer) as u8;
            pos += 1;
        }
    }

    if pos != N || buffer & ((1 << bits_in_buffer) - 1) != 0 {
        return None;
    }
    Some(result)
}

fn encode(version: VersionByte, payload: &[u8; PAYLOAD_LEN]) -> String {
    let mut raw = Zeroizing::new([0u8; RAW_LEN]);
    raw[0] = version as u8;
    raw[1..=PAYLOAD_LEN].copy_from_slice(payload);
    let checksum = crc16_xmodem(&raw[..=PAYLOAD_LEN]);
    raw[PAYLOAD_LEN + 1..].copy_from_slice(&checksum.to_le_bytes());
    encode_base32(&raw[..])
}

fn decode(
    version: VersionByte,
    encoded: &str,
) -> Result<Zeroizing<[u8; PAYLOAD_LEN]>, &'static str> {
    if encoded.len() != ENCODED_LEN {
        return Err("wrong length");
    }
    let raw = Zeroizing::new(decode_base32_fixed::<RAW_LEN>(encoded).ok_or("malformed base32")?);
    if raw[0] != version as u8 {
        return Err("unexpected version byte");
    }
    let expected = crc16_xmodem(&raw[..=PAYLOAD_LEN]);
    let actual = u16::from_le_bytes([raw[PAYLOAD_LEN + 1], raw[PAYLOAD_LEN + 2]]);
    if expected != actual {
        return Err("checksum mismatch");
    }

    let mut payload = Zeroizing::new([0u8; PAYLOAD_LEN]);
    payload.copy_from_slice(&raw[1..=PAYLOAD_LEN]);
    Ok(payload)
}

/// Render a public key as a `G…` account id.
pub fn encode_public_key(public: &PublicKey) -> String {
    encode(VersionByte::AccountId, public.as_bytes())
}

/// Parse a `G…` account id.
pub fn decode_public_key(encoded: &str) -> Result<PublicKey, StrkeyError> {
    let payload = decode(VersionByte::AccountId, encoded).map_err(StrkeyError::InvalidPublicKey)?;
    Ok(PublicKey(*payload))
}

/// Render a private key as an `S…` secret seed.
pub fn encode_secret_seed(private: &PrivateKey) -> Zeroizing<String> {
    Zeroizing::new(encode(VersionByte::SecretSeed, private.as_bytes()))
}

/// Decode an `S…` secret seed and expand it into a keypair.
pub fn keypair_from_encoded_secret(secret: &str) -> Result<KeyPair, StrkeyError> {
    let seed =
        decode(VersionByte::SecretSeed, secret).map_err(StrkeyError::InvalidSecretEncoding)?;
    Ok(keypair_from_seed(&seed))
}
