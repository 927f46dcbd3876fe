//! Wallet metadata document kept inside the vault.
//!
//! Only public information lives here: account indices, labels and account
//! ids. Keys are always re-derived from the mnemonic.

use lodestar_crypto::encode_public_key;
use lodestar_types::PublicKey;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::vault::Vault;

/// Version written by this release.
pub const METADATA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletMetadata {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
    #[serde(default)]
    pub settings: WalletSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// Hardened account index in `m/44'/<coin>'/<index>'`.
    pub index: u32,
    pub label: String,
    /// `G…` account id.
    pub account_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSettings {
    #[serde(default = "default_display_currency")]
    pub display_currency: String,
    #[serde(default)]
    pub hide_zero_balances: bool,
}

fn default_version() -> u32 {
    METADATA_VERSION
}

fn default_display_currency() -> String {
    "USD".to_string()
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            display_currency: default_display_currency(),
            hide_zero_balances: false,
        }
    }
}

impl Default for WalletMetadata {
    fn default() -> Self {
        Self {
            version: METADATA_VERSION,
            accounts: Vec::new(),
            settings: WalletSettings::default(),
        }
    }
}

impl WalletMetadata {
    /// Read the document from `vault`, or an empty one if nothing is stored.
    pub fn load(vault: &Vault) -> Result<Self, VaultError> {
        Ok(vault.get_json()?.unwrap_or_default())
    }

    pub fn save(&self, vault: &Vault) -> Result<(), VaultError> {
        vault.set_json(self)
    }

    /// Record account `index`, replacing any entry with the same index.
    pub fn upsert_account(&mut self, index: u32, label: &str, public: &PublicKey) -> &AccountEntry {
        let entry = AccountEntry {
            index,
            label: label.to_string(),
            account_id: encode_public_key(public),
        };
        let pos = match self.accounts.iter().position(|a| a.index == index) {
            Some(pos) => {
                self.accounts[pos] = entry;
                pos
            }
            None => {
                self.accounts.push(entry);
                self.accounts.sort_by_key(|a| a.index);
                self.accounts.iter().position(|a| a.index == index).unwrap_or(0)
            }
        };
        &self.accounts[pos]
    }

    pub fn account(&self, index: u32) -> Option<&AccountEntry> {
        self.accounts.iter().find(|a| a.index == index)
    }

    /// Lowest index not yet recorded.
    pub fn next_index(&self) -> u32 {
        (0..).find(|i| self.account(*i).is_none()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_keeps_indices_unique_and_sorted() {
        let mut meta = WalletMetadata::default();
        meta.upsert_account(2, "savings", &PublicKey([2u8; 32]));
        meta.upsert_account(0, "main", &PublicKey([0u8; 32]));
        let replaced = meta.upsert_account(2, "rainy day", &PublicKey([2u8; 32]));
        assert_eq!(replaced.label, "rainy day");
        assert_eq!(meta.accounts.len(), 2);
        assert_eq!(meta.accounts[0].index, 0);
        assert_eq!(
            meta.accounts[0].account_id,
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
        assert_eq!(meta.next_index(), 1);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let meta: WalletMetadata = serde_json::from_str(r#"{"accounts":[]}"#).unwrap();
        assert_eq!(meta, WalletMetadata::default());
        assert_eq!(meta.settings.display_currency, "USD");
    }
}
