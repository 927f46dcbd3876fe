//! Ed25519 keypair expansion and account derivation.

use ed25519_dalek::SigningKey;
use lodestar_types::{ExtendedKey, KeyPair, PrivateKey, PublicKey};

use crate::derivation::{derive_path, master_key, DerivationError, DerivationPath, LEDGER_COIN_TYPE};

/// Expand a 32-byte seed into a keypair. Total over all inputs.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    let verifying_key = signing_key.verifying_key();
    KeyPair {
        public: PublicKey(verifying_key.to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Treat the derived node's key half as an Ed25519 seed.
pub fn keypair_from_derived(derived: &ExtendedKey) -> KeyPair {
    keypair_from_seed(&derived.key)
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Derives account keypairs for one coin type.
///
/// Holds no secrets; build one from configuration and share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDeriver {
    coin_type: u32,
}

impl KeyDeriver {
    pub fn new(coin_type: u32) -> Self {
        Self { coin_type }
    }

    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }

    /// `m/44'/<coin_type>'/<index>'`.
    pub fn account_path(&self, index: u32) -> Result<DerivationPath, DerivationError> {
        DerivationPath::ledger_account(self.coin_type, index)
    }

    /// Derive the keypair of account `index` from a BIP-39 seed.
    pub fn account_keypair(&self, seed: &[u8], index: u32) -> Result<KeyPair, DerivationError> {
        let path = self.account_path(index)?;
        let derived = derive_path(&path, &master_key(seed));
        Ok(keypair_from_derived(&derived))
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(LEDGER_COIN_TYPE)
    }
}

/// Account `index` under the ledger's own coin type.
pub fn derive_account(seed: &[u8], index: u32) -> Result<KeyPair, DerivationError> {
    KeyDeriver::default().account_keypair(seed, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::child_key;

    #[test]
    fn keypair_from_seed_deterministic() {
        let seed = [42u8; 32];
        let kp1 = keypair_from_seed(&seed);
        let kp2 = keypair_from_seed(&seed);
        assert_eq!(kp1.public, kp2.public);
        assert_eq!(kp1.private.0, kp2.private.0);
    }

    #[test]
    fn different_seeds_produce_different_keys() {
        let kp1 = keypair_from_seed(&[1u8; 32]);
        let kp2 = keypair_from_seed(&[2u8; 32]);
        assert_ne!(kp1.public, kp2.public);
    }

    #[test]
    fn private_half_is_the_derived_key() {
        let master = master_key(&[0u8; 64]);
        let derived = child_key("m/44'/148'/0'", &master).unwrap();
        let kp = keypair_from_derived(&derived);
        assert_eq!(kp.private.0, derived.key);
        assert_eq!(public_from_private(&kp.private), kp.public);
    }

    #[test]
    fn all_zero_seed_is_accepted() {
        let kp = keypair_from_seed(&[0u8; 32]);
        assert_ne!(kp.public.0, [0u8; 32]);
    }

    #[test]
    fn deriver_matches_manual_path() {
        let seed = [9u8; 64];
        let manual = keypair_from_derived(&child_key("m/44'/148'/3'", &master_key(&seed)).unwrap());
        let kp = derive_account(&seed, 3).unwrap();
        assert_eq!(kp.public, manual.public);
    }

    #[test]
    fn coin_type_changes_the_account() {
        let seed = [9u8; 64];
        let ledger = KeyDeriver::default().account_keypair(&seed, 0).unwrap();
        let other = KeyDeriver::new(1).account_keypair(&seed, 0).unwrap();
        assert_ne!(ledger.public, other.public);
        assert_eq!(KeyDeriver::new(1).account_path(0).unwrap().to_string(), "m/44'/1'/0'");
    }

    #[test]
    fn hardened_account_index_rejected() {
        assert!(derive_account(&[0u8; 64], 0x8000_0000).is_err());
    }
}
