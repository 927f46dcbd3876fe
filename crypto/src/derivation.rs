//! SLIP-10 hierarchical key derivation, hardened-only Ed25519 profile.
//!
//! The master key is `HMAC-SHA512(key = "ed25519 seed", msg = seed)`. Each
//! path segment then folds over the accumulator:
//!
//! ```text
//! data   = 0x00 || parent.key || be32(index + 2^31)
//! digest = HMAC-SHA512(key = parent.chain_code, msg = data)
//! child  = { key: digest[..32], chain_code: digest[32..] }
//! ```
//!
//! Ed25519 has no public derivation, so every segment is hardened whether or
//! not the textual path carries an apostrophe. `m/44'/148'/0'` and
//! `m/44/148/0` name the same key.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use lodestar_types::ExtendedKey;
use sha2::Sha512;
use thiserror::Error;
use tracing::debug;

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for the master node of the ed25519 curve.
const ED25519_CURVE: &[u8] = b"ed25519 seed";

/// Offset applied to every index to mark it hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP-44 purpose field.
pub const BIP44_PURPOSE: u32 = 44;

/// Registered coin type of the ledger (SEP-0005).
pub const LEDGER_COIN_TYPE: u32 = 148;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerivationError {
    #[error("invalid derivation path segment: {0:?}")]
    InvalidPathSegment(String),
}

/// An ordered list of (unhardened) child indices, rendered as `m/a'/b'/c'`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Build a path from raw indices. Each must be below `2^31`.
    pub fn new(indices: Vec<u32>) -> Result<Self, DerivationError> {
        if let Some(bad) = indices.iter().find(|i| **i >= HARDENED_OFFSET) {
            return Err(DerivationError::InvalidPathSegment(bad.to_string()));
        }
        Ok(Self(indices))
    }

    /// `m/44'/<coin_type>'/<account>'`.
    pub fn ledger_account(coin_type: u32, account: u32) -> Result<Self, DerivationError> {
        Self::new(vec![BIP44_PURPOSE, coin_type, account])
    }

    /// Parse `m/i1'/i2'/...`. Apostrophes are optional and ignored.
    pub fn parse(path: &str) -> Result<Self, DerivationError> {
        let mut segments = path.split('/');
        match segments.next() {
            Some("m") => {}
            other => {
                return Err(DerivationError::InvalidPathSegment(
                    other.unwrap_or_default().to_string(),
                ))
            }
        }

        let indices = segments
            .map(|segment| {
                let digits = segment.strip_suffix('\'').unwrap_or(segment);
                digits
                    .parse::<u32>()
                    .ok()
                    .filter(|i| *i < HARDENED_OFFSET)
                    .ok_or_else(|| DerivationError::InvalidPathSegment(segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(indices))
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Depth below the master node.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{}'", index)?;
        }
        Ok(())
    }
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    let mut digest = [0u8; 64];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Derive the master node from seed bytes of any length.
pub fn master_key(seed: &[u8]) -> ExtendedKey {
    ExtendedKey::from_digest(&hmac_sha512(ED25519_CURVE, &[seed]))
}

/// One hardened child step from `parent`.
pub fn derive_hardened(parent: &ExtendedKey, index: u32) -> ExtendedKey {
    let hardened = index | HARDENED_OFFSET;
    ExtendedKey::from_digest(&hmac_sha512(
        &parent.chain_code,
        &[&[0x00], &parent.key, &hardened.to_be_bytes()],
    ))
}

/// Walk `path` from `master`, left to right.
pub fn derive_path(path: &DerivationPath, master: &ExtendedKey) -> ExtendedKey {
    let derived = path
        .indices()
        .iter()
        .fold(master.clone(), |acc, index| derive_hardened(&acc, *index));
    debug!(path = %path, "derived child key");
    derived
}

/// Parse `path` and derive the child key from `master`.
pub fn child_key(path: &str, master: &ExtendedKey) -> Result<ExtendedKey, DerivationError> {
    let path = DerivationPath::parse(path)?;
    Ok(derive_path(&path, master))
}
