//! Ed25519 key types for account identity.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

/// A 32-byte Ed25519 secret seed.
///
/// Deliberately not `Debug` or `Clone`. Bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// An Ed25519 key pair (public + private).
///
/// Built by `lodestar_crypto`; the struct itself is just data and keeps no
/// reference to whatever it was derived from.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl PrivateKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_debug_redacts_private_half() {
        let kp = KeyPair {
            public: PublicKey([1u8; 32]),
            private: PrivateKey([0xAB; 32]),
        };
        let rendered = format!("{:?}", kp);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("abab"));
    }

    #[test]
    fn public_key_debug_is_hex() {
        let pk = PublicKey([0x0F; 32]);
        assert_eq!(format!("{:?}", pk), format!("PublicKey({})", "0f".repeat(32)));
    }
}
