//! Fundamental types for the Lodestar wallet.
//!
//! Everything here is plain data shared by the derivation engine and the
//! vault: Ed25519 key material, SLIP-10 extended keys, and the two seams
//! (clock and entropy) that tests replace with deterministic doubles.

pub mod entropy;
pub mod extended;
pub mod keys;
pub mod time;

pub use entropy::EntropySource;
pub use extended::{ExtendedKey, Seed};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use time::{Clock, SystemClock};
