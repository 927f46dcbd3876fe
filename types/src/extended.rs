//! SLIP-10 extended keys and BIP-39 seeds.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A key together with its chain code.
///
/// The master key and every derived child share this shape. Both halves are
/// zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    pub key: [u8; 32],
    pub chain_code: [u8; 32],
}

impl ExtendedKey {
    /// Split a 64-byte HMAC-SHA512 digest into key (left) and chain code (right).
    pub fn from_digest(digest: &[u8; 64]) -> Self {
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
        Self { key, chain_code }
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtendedKey(<redacted>)")
    }
}

/// Seed bytes produced from a mnemonic phrase plus optional passphrase.
///
/// Usually 64 bytes, but derivation accepts any length.
pub struct Seed(Zeroizing<Vec<u8>>);

impl Seed {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<[u8; 64]> for Seed {
    fn from(bytes: [u8; 64]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digest_splits_left_and_right() {
        let mut digest = [0u8; 64];
        digest[..32].fill(1);
        digest[32..].fill(2);
        let ext = ExtendedKey::from_digest(&digest);
        assert_eq!(ext.key, [1u8; 32]);
        assert_eq!(ext.chain_code, [2u8; 32]);
    }

    #[test]
    fn debug_never_prints_bytes() {
        let ext = ExtendedKey {
            key: [0x11; 32],
            chain_code: [0x22; 32],
        };
        assert_eq!(format!("{:?}", ext), "ExtendedKey(<redacted>)");
    }

    #[test]
    fn seed_from_array() {
        let seed = Seed::from([9u8; 64]);
        assert_eq!(seed.len(), 64);
        assert!(!seed.is_empty());
        assert_eq!(seed.as_bytes()[0], 9);
    }
}
