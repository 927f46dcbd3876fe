//! Wallet configuration with TOML file support.
//!
//! Built once at startup and handed by reference to whatever needs it; there
//! is no global configuration state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use lodestar_crypto::{CipherScheme, KeyDeriver, MnemonicStrength, LEDGER_COIN_TYPE, PIN_ROUNDS};

use crate::error::ConfigError;

/// Configuration for a Lodestar wallet.
///
/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Directory holding the vault files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage key of the wallet's vault. The salt lives at `<location>-salt`.
    #[serde(default = "default_vault_location")]
    pub vault_location: String,

    /// BIP-44 coin type used for account paths.
    #[serde(default = "default_coin_type")]
    pub coin_type: u32,

    /// Length of newly generated mnemonics.
    #[serde(default)]
    pub mnemonic_strength: MnemonicStrength,

    /// PBKDF2 rounds applied to the PIN. Changing it makes existing vaults
    /// unreadable.
    #[serde(default = "default_pin_rounds")]
    pub pin_rounds: u32,

    /// Payload cipher. `legacy-cbc` reads vaults written by earlier releases.
    #[serde(default)]
    pub cipher: CipherScheme,

    /// Seconds before an open vault locks itself. 0 disables auto-lock.
    #[serde(default = "default_auto_lock_secs")]
    pub auto_lock_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./lodestar_data")
}

fn default_vault_location() -> String {
    "wallet".to_string()
}

fn default_coin_type() -> u32 {
    LEDGER_COIN_TYPE
}

fn default_pin_rounds() -> u32 {
    PIN_ROUNDS
}

fn default_auto_lock_secs() -> u64 {
    300
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Auto-lock timeout, `None` when disabled.
    pub fn auto_lock(&self) -> Option<Duration> {
        (self.auto_lock_secs > 0).then(|| Duration::from_secs(self.auto_lock_secs))
    }

    pub fn key_deriver(&self) -> KeyDeriver {
        KeyDeriver::new(self.coin_type)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            vault_location: default_vault_location(),
            coin_type: default_coin_type(),
            mnemonic_strength: MnemonicStrength::default(),
            pin_rounds: default_pin_rounds(),
            cipher: CipherScheme::default(),
            auto_lock_secs: default_auto_lock_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
