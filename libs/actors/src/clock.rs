//! Monotonic Table Clock
//!
//! Millisecond readings relative to the moment the table was laid. Built on
//! `tokio::time::Instant` so a paused test runtime drives it deterministically.

use std::time::Duration;
use tokio::time::Instant;

/// Monotonic millisecond time source shared by every task at one table
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Start a clock anchored at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Instant at which the clock reads `ms`
    pub fn instant_at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
