//! Shared Stop Flag
//!
//! A single boolean raised by the grim reaper when the dinner ends. Every
//! read and write goes through one lock, so a task that observes `false`
//! can never see the simulation end "in the past" of its own critical section.
//!
//! The flag also wakes sleeping philosophers: `sleep` races the timer against
//! a notification fired by `set_stopped`, so a stop is noticed immediately
//! instead of at the next polling tick.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Stop signal observed by all tasks, written only by the reaper
#[derive(Debug, Default)]
pub struct StopFlag {
    stopped: Mutex<bool>,
    wakeup: Notify,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Idempotent; the flag is never lowered again.
    pub fn set_stopped(&self) {
        let mut stopped = self.stopped.lock();
        if !*stopped {
            *stopped = true;
            drop(stopped);
            self.wakeup.notify_waiters();
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }

    /// Sleep for `duration` unless the flag is raised first.
    ///
    /// Returns `true` when the full duration elapsed with the flag still down.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let notified = self.wakeup.notified();
        tokio::pin!(notified);
        // Register before checking so a stop between the check and the
        // select cannot be missed.
        notified.as_mut().enable();

        if self.is_stopped() {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_stopped(),
            _ = &mut notified => false,
        }
    }
}
