//! Opens vaults and keeps one live vault per location.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use lodestar_crypto::{vault_key_from_pin, CipherScheme, OsEntropy};
use lodestar_store::KeyValueStore;
use lodestar_types::{Clock, EntropySource, SystemClock};
use tracing::{debug, info};

use crate::config::WalletConfig;
use crate::error::{ConstructionError, VaultError};
use crate::vault::{spawn_auto_lock, LockHandle, Vault, VaultKey, VaultParts};

/// Random salt bytes generated for a new location.
pub const SALT_LEN: usize = 16;

/// Builds [`Vault`]s over one store.
///
/// Opening a location that already has a live vault from this factory locks
/// the older one first, so at most one unlocked vault per location exists.
pub struct VaultFactory {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn EntropySource>,
    pin_rounds: u32,
    cipher: CipherScheme,
    open_vaults: Mutex<HashMap<String, Weak<LockHandle>>>,
}

impl VaultFactory {
    pub fn new(config: &WalletConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            entropy: Arc::new(OsEntropy),
            pin_rounds: config.pin_rounds,
            cipher: config.cipher,
            open_vaults: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Unlock the vault at `location` with `pin`.
    ///
    /// The PIN is not checked here: a wrong one yields a key that fails later,
    /// on the first read. A zero `timeout` means no auto-lock, and one too
    /// large to represent as a deadline is left to the timer alone.
    pub fn open(
        &self,
        location: &str,
        pin: &str,
        timeout: Option<Duration>,
    ) -> Result<Vault, VaultError> {
        if location.is_empty() {
            return Err(ConstructionError::EmptyLocation.into());
        }
        if pin.is_empty() {
            return Err(ConstructionError::EmptyPin.into());
        }

        let salt = self.load_or_create_salt(location)?;
        let key = vault_key_from_pin(pin, &salt, self.pin_rounds);
        let handle = LockHandle::new(VaultKey::new(*key));
        self.replace_open_vault(location, &handle);

        let timeout = timeout.filter(|t| !t.is_zero());
        let deadline = timeout.and_then(|t| self.clock.now().checked_add(t));
        if let Some(timeout) = timeout {
            spawn_auto_lock(&handle, location, timeout);
        }

        info!(
            location,
            cipher = self.cipher.as_str(),
            auto_lock_secs = ?timeout.map(|t| t.as_secs()),
            "vault opened"
        );

        Ok(Vault::from_parts(VaultParts {
            location: location.to_string(),
            salt,
            scheme: self.cipher,
            lock: handle,
            deadline,
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            entropy: Arc::clone(&self.entropy),
        }))
    }

    /// Locations with a live, unlocked vault from this factory.
    pub fn open_locations(&self) -> Vec<String> {
        let open = self.open_vaults.lock().unwrap_or_else(PoisonError::into_inner);
        let mut locations: Vec<String> = open
            .iter()
            .filter(|(_, weak)| weak.upgrade().is_some_and(|h| !h.is_locked()))
            .map(|(location, _)| location.clone())
            .collect();
        locations.sort();
        locations
    }

    fn load_or_create_salt(&self, location: &str) -> Result<String, VaultError> {
        let salt_key = format!("{location}-salt");
        if let Some(existing) = self.store.get(&salt_key)? {
            if existing.len() != SALT_LEN * 2 || !existing.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ConstructionError::MalformedSalt {
                    location: location.to_string(),
                }
                .into());
            }
            debug!(location, "using stored salt");
            return Ok(existing);
        }

        let mut bytes = [0u8; SALT_LEN];
        self.entropy.fill_bytes(&mut bytes);
        let salt = hex::encode(bytes);
        self.store.set(&salt_key, &salt)?;
        info!(location, "generated new vault salt");
        Ok(salt)
    }

    fn replace_open_vault(&self, location: &str, handle: &Arc<LockHandle>) {
        let mut open = self.open_vaults.lock().unwrap_or_else(PoisonError::into_inner);
        open.retain(|_, weak| weak.strong_count() > 0);
        let previous = open
            .insert(location.to_string(), Arc::downgrade(handle))
            .and_then(|weak| weak.upgrade());
        if let Some(previous) = previous {
            if previous.lock() {
                info!(location, "locked previous vault for this location");
            }
        }
    }
}
