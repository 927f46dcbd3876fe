use lodestar_crypto::CipherError;
use lodestar_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault is locked")]
    VaultLocked,

    #[error("cannot open vault: {0}")]
    Construction(#[from] ConstructionError),

    /// Decryption or parsing of the stored payload failed. With the legacy
    /// cipher this is the only hint of a wrong PIN.
    #[error("stored data could not be decrypted or parsed; the PIN may be wrong")]
    PossiblyWrongPin,

    #[error("stored ciphertext is not valid hex: {0}")]
    Encoding(String),

    #[error("cipher error: {0}")]
    Cipher(CipherError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Misuse detected while opening a vault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("vault location must not be empty")]
    EmptyLocation,

    #[error("PIN must not be empty")]
    EmptyPin,

    #[error("salt stored for {location:?} is not 16 hex-encoded bytes")]
    MalformedSalt { location: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(String),

    #[error("invalid config: {0}")]
    Parse(String),
}
