//! Wallet core library for Lodestar.
//!
//! Provides the stateful half of the wallet:
//! - PIN-gated encrypted vault with auto-lock ([`Vault`], [`VaultFactory`])
//! - Wallet configuration loaded from TOML ([`WalletConfig`])
//! - The wallet metadata document stored inside the vault
//!
//! Key derivation lives in `lodestar-crypto`; derived keys never pass through
//! the vault.

pub mod config;
pub mod error;
pub mod factory;
pub mod metadata;
pub mod vault;

pub use config::WalletConfig;
pub use error::{ConfigError, ConstructionError, VaultError};
pub use factory::VaultFactory;
pub use metadata::{AccountEntry, WalletMetadata, WalletSettings};
pub use vault::Vault;
