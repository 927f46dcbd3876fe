//! Nullable infrastructure for deterministic testing.
//!
//! The vault reaches the outside world through three seams: a clock (auto-lock
//! deadline), an entropy source (salts, nonces) and a key-value store. This
//! crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod random;
pub mod store;

pub use clock::NullClock;
pub use random::NullRandom;
pub use store::NullStore;
