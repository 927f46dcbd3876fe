//! Storage backends for the Lodestar wallet.
//!
//! The vault only needs string get/set by key. Every backend (files on disk,
//! in-memory for tests or when no disk is available) implements
//! [`KeyValueStore`]; the rest of the workspace depends only on the trait.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous string-keyed storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
