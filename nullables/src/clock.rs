//! Nullable clock: deterministic time for testing.

use lodestar_types::Clock;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A clock that only advances when told to.
pub struct NullClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl NullClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Advance time.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for NullClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap()
    }
}
