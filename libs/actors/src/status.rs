//! Status Events and Output Sinks
//!
//! Every philosopher state change becomes a `StatusEvent` handed to a
//! `StatusSink`. The `Reporter` serializes emission and drops events raised
//! after the stop flag, except the death announcement itself, so nothing is
//! printed after a philosopher dies.

use crate::clock::Clock;
use crate::stop::StopFlag;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// State change announced by a philosopher or by the reaper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhilosopherStatus {
    /// First fork in acquisition order taken
    TookFirstFork { fork: usize },
    /// Second fork in acquisition order taken
    TookSecondFork { fork: usize },
    Eating,
    Sleeping,
    Thinking,
    Died,
}

impl PhilosopherStatus {
    /// Event label as printed on the console
    pub fn as_str(&self) -> &'static str {
        match self {
            PhilosopherStatus::TookFirstFork { .. } | PhilosopherStatus::TookSecondFork { .. } => {
                "took a fork"
            }
            PhilosopherStatus::Eating => "is eating",
            PhilosopherStatus::Sleeping => "is sleeping",
            PhilosopherStatus::Thinking => "is thinking",
            PhilosopherStatus::Died => "died",
        }
    }

    /// Fork index for fork events
    pub fn fork(&self) -> Option<usize> {
        match self {
            PhilosopherStatus::TookFirstFork { fork }
            | PhilosopherStatus::TookSecondFork { fork } => Some(*fork),
            _ => None,
        }
    }

    pub fn is_death(&self) -> bool {
        matches!(self, PhilosopherStatus::Died)
    }
}

impl fmt::Display for PhilosopherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of simulation output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Milliseconds since the synchronized start
    pub elapsed_ms: u64,
    /// 1-based philosopher number
    pub philosopher: usize,
    pub status: PhilosopherStatus,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.elapsed_ms, self.philosopher, self.status)
    }
}

/// Destination for status events
///
/// Called while the reporter's write lock is held, so implementations must
/// not block for long and must never call back into the table.
pub trait StatusSink: Send + Sync + fmt::Debug {
    fn emit(&self, event: StatusEvent);
}

/// Sink forwarding events into an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelSink {
    /// Create a sink together with the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl StatusSink for ChannelSink {
    fn emit(&self, event: StatusEvent) {
        // A dropped receiver just means nobody is listening any more
        if self.sender.send(event).is_err() {
            trace!(?event, "Status receiver closed; event discarded");
        }
    }
}

/// Serialized, stop-aware event emission for one table
#[derive(Debug)]
pub struct Reporter {
    sink: Arc<dyn StatusSink>,
    write_lock: Mutex<()>,
}

impl Reporter {
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        Self {
            sink,
            write_lock: Mutex::new(()),
        }
    }

    /// Emit `status` for the 0-based `seat`
    ///
    /// Non-death events are dropped once `stop` is raised. The check happens
    /// under the write lock, so once the reaper has raised the flag and
    /// announced a death, no later line can slip out.
    pub fn report(
        &self,
        clock: &Clock,
        start_ms: u64,
        stop: &StopFlag,
        seat: usize,
        status: PhilosopherStatus,
    ) {
        let _write = self.write_lock.lock();
        if !status.is_death() && stop.is_stopped() {
            return;
        }

        let event = StatusEvent {
            elapsed_ms: clock.now_ms().saturating_sub(start_ms),
            philosopher: seat + 1,
            status,
        };
        trace!(%event, "status");
        self.sink.emit(event);
    }
}
