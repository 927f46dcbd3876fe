//! Shared utilities for the Lodestar wallet.

pub mod logging;

pub use logging::{init_logging, LogFormat};
