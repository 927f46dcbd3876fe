//! BIP-39 mnemonics and the seed they produce.
//!
//! Seeds come from `PBKDF2-HMAC-SHA512(mnemonic, "mnemonic" || passphrase, 2048)`
//! via the `bip39` crate; account keys are then derived from the seed along
//! `m/44'/148'/n'` (see [`crate::derivation`]).

use bip39::Mnemonic;
use lodestar_types::{EntropySource, KeyPair, Seed};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::derivation::DerivationError;
use crate::keys::derive_account;

/// Errors arising from mnemonic operations.
#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("entropy must be {expected} bytes for this mnemonic strength, got {actual}")]
    InvalidEntropy { expected: usize, actual: usize },

    #[error(transparent)]
    Derivation(#[from] DerivationError),
}

/// Mnemonic length the wallet generates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MnemonicStrength {
    /// 128-bit entropy.
    Words12,
    /// 256-bit entropy.
    #[default]
    Words24,
}

impl MnemonicStrength {
    pub fn entropy_len(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words24 => 32,
        }
    }

    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }
}

/// Build a mnemonic from caller-supplied entropy.
///
/// The entropy length must match `strength` exactly.
pub fn mnemonic_from_entropy(
    entropy: &[u8],
    strength: MnemonicStrength,
) -> Result<Zeroizing<String>, MnemonicError> {
    if entropy.len() != strength.entropy_len() {
        return Err(MnemonicError::InvalidEntropy {
            expected: strength.entropy_len(),
            actual: entropy.len(),
        });
    }
    let mnemonic = Mnemonic::from_entropy(entropy)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Generate a fresh mnemonic of the given strength.
pub fn generate_mnemonic(
    strength: MnemonicStrength,
    entropy: &dyn EntropySource,
) -> Result<Zeroizing<String>, MnemonicError> {
    let mut bytes = Zeroizing::new(vec![0u8; strength.entropy_len()]);
    entropy.fill_bytes(&mut bytes);
    mnemonic_from_entropy(&bytes, strength)
}

/// Validate that a phrase is a well-formed BIP-39 mnemonic.
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_normalized(phrase).is_ok()
}

/// Convert a mnemonic plus optional passphrase into seed bytes.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed, MnemonicError> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;
    Ok(Seed::from(mnemonic.to_seed_normalized(passphrase)))
}

/// Derive account `index` straight from a mnemonic.
pub fn keypair_from_mnemonic(
    phrase: &str,
    passphrase: &str,
    index: u32,
) -> Result<KeyPair, MnemonicError> {
    let seed = mnemonic_to_seed(phrase, passphrase)?;
    Ok(derive_account(seed.as_bytes(), index)?)
}
