//! PIN-gated encrypted blob storage.
//!
//! A [`Vault`] holds the AES key stretched from the user's PIN while it is
//! unlocked. Payloads are encrypted, hex-encoded and written to the backing
//! [`KeyValueStore`] under the vault's location; the PBKDF2 salt sits next to
//! them at `<location>-salt`.
//!
//! Once locked a vault stays locked. Locking happens on an explicit
//! [`Vault::lock`], when the auto-lock timeout elapses, when the same
//! [`VaultFactory`](crate::VaultFactory) opens a newer vault at the same
//! location, or when the vault is dropped. The key is zeroized in every case.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lodestar_crypto::{decrypt, encrypt, CipherError, CipherScheme};
use lodestar_store::KeyValueStore;
use lodestar_types::{Clock, EntropySource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::VaultError;

/// SHA-256 of the PIN digest. Never leaves this module.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct VaultKey([u8; 32]);

impl VaultKey {
    pub(crate) fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

struct LockState {
    key: Option<VaultKey>,
    /// Cancels the pending auto-lock task, if any.
    cancel: Option<oneshot::Sender<()>>,
}

/// Lock state shared between a vault, its auto-lock task and the factory
/// registry. Only the vault holds a strong reference.
pub(crate) struct LockHandle {
    state: Mutex<LockState>,
}

impl LockHandle {
    pub(crate) fn new(key: VaultKey) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(LockState {
                key: Some(key),
                cancel: None,
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the key and cancel the timer. Returns whether the vault was
    /// unlocked before the call.
    pub(crate) fn lock(&self) -> bool {
        let mut state = self.state();
        let was_unlocked = state.key.take().is_some();
        if let Some(cancel) = state.cancel.take() {
            let _ = cancel.send(());
        }
        was_unlocked
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.state().key.is_none()
    }

    fn key(&self) -> Option<Zeroizing<[u8; 32]>> {
        self.state().key.as_ref().map(|key| Zeroizing::new(key.0))
    }
}

/// Lock `handle` after `timeout` unless it is locked or dropped first.
///
/// Needs a Tokio runtime. Without one the deadline check in every vault
/// operation still enforces the timeout.
pub(crate) fn spawn_auto_lock(handle: &Arc<LockHandle>, location: &str, timeout: Duration) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        debug!(location, "no async runtime, auto-lock checked on access only");
        return;
    };

    let (cancel_tx, cancel_rx) = oneshot::channel();
    handle.state().cancel = Some(cancel_tx);

    let weak = Arc::downgrade(handle);
    let location = location.to_string();
    runtime.spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                if let Some(handle) = weak.upgrade() {
                    if handle.lock() {
                        info!(location = %location, "vault auto-locked");
                    }
                }
            }
            // Fires on explicit lock, and on drop of the sender.
            _ = cancel_rx => {}
        }
    });
}

/// An opened vault. See the module docs for the locking rules.
pub struct Vault {
    location: String,
    salt: String,
    scheme: CipherScheme,
    lock: Arc<LockHandle>,
    deadline: Option<Instant>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn EntropySource>,
}

pub(crate) struct VaultParts {
    pub location: String,
    pub salt: String,
    pub scheme: CipherScheme,
    pub lock: Arc<LockHandle>,
    pub deadline: Option<Instant>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub entropy: Arc<dyn EntropySource>,
}

impl Vault {
    pub(crate) fn from_parts(parts: VaultParts) -> Self {
        Self {
            location: parts.location,
            salt: parts.salt,
            scheme: parts.scheme,
            lock: parts.lock,
            deadline: parts.deadline,
            store: parts.store,
            clock: parts.clock,
            entropy: parts.entropy,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Hex salt the key was stretched with.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn cipher(&self) -> CipherScheme {
        self.scheme
    }

    /// Time left before auto-lock, `None` when the vault has no deadline.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    pub fn is_locked(&self) -> bool {
        self.expire_if_due();
        self.lock.is_locked()
    }

    /// Forget the key. Idempotent.
    pub fn lock(&self) {
        if self.lock.lock() {
            info!(location = %self.location, "vault locked");
        }
    }

    /// Decrypt and return the stored payload, `None` if nothing was stored.
    ///
    /// A payload that fails to decrypt is reported as
    /// [`VaultError::PossiblyWrongPin`]. The legacy cipher has no
    /// authentication, so under a wrong PIN its padding can still check out
    /// by chance. In that case the garbage bytes are returned as `Ok`.
    pub fn get_data(&self) -> Result<Option<Vec<u8>>, VaultError> {
        let key = self.unlocked_key()?;
        let stored = match self.store.get(&self.location)? {
            Some(stored) if !stored.is_empty() => stored,
            _ => return Ok(None),
        };

        let ciphertext =
            hex::decode(stored.trim()).map_err(|e| VaultError::Encoding(e.to_string()))?;
        match decrypt(self.scheme, &key, &ciphertext) {
            Ok(plaintext) => Ok(Some(plaintext)),
            Err(CipherError::Decrypt) => {
                warn!(location = %self.location, "vault payload failed to decrypt");
                Err(VaultError::PossiblyWrongPin)
            }
            Err(e) => Err(VaultError::Cipher(e)),
        }
    }

    /// Encrypt `data` and replace the stored payload. An empty slice leaves
    /// the store untouched.
    pub fn set_data(&self, data: &[u8]) -> Result<(), VaultError> {
        let key = self.unlocked_key()?;
        if data.is_empty() {
            debug!(location = %self.location, "empty payload, nothing written");
            return Ok(());
        }

        let ciphertext = encrypt(self.scheme, &key, data, self.entropy.as_ref())
            .map_err(VaultError::Cipher)?;
        self.store.set(&self.location, &hex::encode(ciphertext))?;
        debug!(location = %self.location, bytes = data.len(), "vault payload written");
        Ok(())
    }

    /// [`get_data`](Self::get_data) followed by JSON parsing. Garbage from
    /// the legacy cipher under a wrong PIN surfaces here as
    /// [`VaultError::PossiblyWrongPin`].
    pub fn get_json<T: DeserializeOwned>(&self) -> Result<Option<T>, VaultError> {
        let Some(bytes) = self.get_data()? else {
            return Ok(None);
        };
        let bytes = Zeroizing::new(bytes);
        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            warn!(location = %self.location, error = %e, "vault payload is not valid JSON");
            VaultError::PossiblyWrongPin
        })
    }

    pub fn set_json<T: Serialize>(&self, value: &T) -> Result<(), VaultError> {
        let bytes = Zeroizing::new(
            serde_json::to_vec(value).map_err(|e| VaultError::Serialization(e.to_string()))?,
        );
        self.set_data(&bytes)
    }

    fn expire_if_due(&self) {
        if let Some(deadline) = self.deadline {
            if self.clock.now() >= deadline && self.lock.lock() {
                info!(location = %self.location, "vault auto-locked");
            }
        }
    }

    fn unlocked_key(&self) -> Result<Zeroizing<[u8; 32]>, VaultError> {
        self.expire_if_due();
        self.lock.key().ok_or(VaultError::VaultLocked)
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        self.lock.lock();
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("location", &self.location)
            .field("cipher", &self.scheme)
            .field("locked", &self.lock.is_locked())
            .finish_non_exhaustive()
    }
}
