//! Cryptography for the Lodestar wallet.
//!
//! - **SLIP-10** hardened-only Ed25519 derivation along `m/44'/148'/n'`
//! - **BIP-39** mnemonics and seeds
//! - **Strkey** `G…`/`S…` encoding of account ids and secret seeds
//! - **PBKDF2-HMAC-SHA512** PIN stretching for the vault key
//! - **AES-256** vault payload ciphers (legacy CBC, GCM)

pub mod cipher;
pub mod derivation;
pub mod entropy;
pub mod keys;
pub mod mnemonic;
pub mod pin;
pub mod strkey;

pub use cipher::{decrypt, encrypt, CipherError, CipherScheme};
pub use derivation::{
    child_key, derive_hardened, derive_path, master_key, DerivationError, DerivationPath,
    HARDENED_OFFSET, LEDGER_COIN_TYPE,
};
pub use entropy::OsEntropy;
pub use keys::{
    derive_account, keypair_from_derived, keypair_from_seed, public_from_private, KeyDeriver,
};
pub use mnemonic::{
    generate_mnemonic, keypair_from_mnemonic, mnemonic_from_entropy, mnemonic_to_seed,
    validate_mnemonic, MnemonicError, MnemonicStrength,
};
pub use pin::{pin_digest, pin_digest_with_rounds, vault_key_from_pin, PIN_ROUNDS};
pub use strkey::{
    decode_public_key, encode_public_key, encode_secret_seed, keypair_from_encoded_secret,
    StrkeyError,
};
