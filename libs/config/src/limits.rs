//! Simulation limits and timing defaults
//!
//! Constants used across the table, philosopher and reaper tasks so that
//! every component agrees on the same timing margins.

/// Table size limits
pub mod table {
    /// Largest accepted number of philosophers
    pub const MAX_PHILOSOPHERS: usize = 250;

    /// Largest accepted numeric argument (signed 32-bit maximum)
    pub const MAX_ARGUMENT: u64 = 2_147_483_647;
}

/// Timing defaults shared by every task
pub mod timing {
    /// Start barrier offset per philosopher (milliseconds).
    ///
    /// The synchronized start is placed `philosophers * START_DELAY_PER_PHILOSOPHER_MS`
    /// in the future so every task is spawned before the barrier releases.
    pub const START_DELAY_PER_PHILOSOPHER_MS: u64 = 20;

    /// Grim reaper scan interval (milliseconds)
    pub const REAPER_POLL_INTERVAL_MS: u64 = 1;

    /// Think durations above this value are replaced by `THINK_FALLBACK_MS`
    pub const THINK_CEILING_MS: i64 = 600;

    /// Think duration used when the computed one exceeds `THINK_CEILING_MS`
    pub const THINK_FALLBACK_MS: i64 = 200;

    /// Minimum stagger applied to the silent first think of odd philosophers
    pub const STAGGER_MIN_MS: i64 = 1;
}
