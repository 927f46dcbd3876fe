//! Monotonic clock seam used by the vault's auto-lock deadline.

use std::time::Instant;

/// Source of monotonic time.
///
/// Production code uses [`SystemClock`]; tests substitute a clock they can
/// advance by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
