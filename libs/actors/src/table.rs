//! Dining Table
//!
//! Owns everything one dinner shares: configuration, the fork ring, the
//! seats, the stop flag and the synchronized start. `Table::run` lays the
//! table, spawns one task per philosopher plus the grim reaper, and joins
//! them all.
//!
//! # Lock Ordering
//!
//! When a task holds more than one lock, it follows this order:
//! 1. seat meal state
//! 2. reporter write lock
//! 3. stop flag

use crate::clock::Clock;
use crate::error::{Result, TableError};
use crate::forks::{fork_order, ForkSet};
use crate::philosopher::{Philosopher, Seat};
use crate::reaper::{GrimReaper, SimulationOutcome};
use crate::status::{PhilosopherStatus, Reporter, StatusSink};
use crate::stop::StopFlag;
use philo_config::timing::START_DELAY_PER_PHILOSOPHER_MS;
use philo_config::SimulationConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// State shared by every task at one table
#[derive(Debug)]
pub struct TableState {
    config: SimulationConfig,
    clock: Clock,
    start_ms: u64,
    forks: ForkSet,
    seats: Vec<Seat>,
    stop: StopFlag,
    reporter: Reporter,
}

impl TableState {
    /// Lay a table whose synchronized start is `start_delay_ms` from now
    pub fn new(
        config: SimulationConfig,
        sink: Arc<dyn StatusSink>,
        start_delay_ms: u64,
    ) -> Arc<Self> {
        let clock = Clock::new();
        let start_ms = clock.now_ms() + start_delay_ms;
        let n = config.philosophers;

        let seats = (0..n)
            .map(|index| Seat::new(index, fork_order(index, n), start_ms))
            .collect();

        Arc::new(Self {
            config,
            clock,
            start_ms,
            forks: ForkSet::new(n),
            seats,
            stop: StopFlag::new(),
            reporter: Reporter::new(sink),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Clock reading of the synchronized start
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn forks(&self) -> &ForkSet {
        &self.forks
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn stop(&self) -> &StopFlag {
        &self.stop
    }

    /// Milliseconds since the synchronized start
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.start_ms)
    }

    /// Block until the synchronized start
    pub async fn wait_for_start(&self) {
        tokio::time::sleep_until(self.clock.instant_at(self.start_ms)).await;
    }

    /// Emit a status event for the 0-based `seat`
    pub fn report(&self, seat: usize, status: PhilosopherStatus) {
        self.reporter
            .report(&self.clock, self.start_ms, &self.stop, seat, status);
    }

    /// Meals eaten per seat, in seat order
    pub fn meal_counts(&self) -> Vec<u64> {
        self.seats.iter().map(Seat::meals_eaten).collect()
    }
}

/// Summary of a finished dinner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub outcome: SimulationOutcome,
    /// Meals eaten per philosopher, in seat order
    pub meals: Vec<u64>,
    pub must_eat: Option<u64>,
    /// Milliseconds from the synchronized start until every task joined
    pub elapsed_ms: u64,
}

impl SimulationReport {
    /// Philosophers who reached the quota (all of them when there is none)
    pub fn satisfied(&self) -> usize {
        match self.must_eat {
            Some(must_eat) => self.meals.iter().filter(|&&meals| meals >= must_eat).count(),
            None => self.meals.len(),
        }
    }
}

/// Orchestrator for one dinner
#[derive(Debug)]
pub struct Table {
    config: SimulationConfig,
    sink: Arc<dyn StatusSink>,
}

impl Table {
    /// Validate the configuration and prepare a table
    pub fn new(config: SimulationConfig, sink: Arc<dyn StatusSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    /// Run the dinner to completion
    ///
    /// Spawns one task per philosopher and, when needed, the grim reaper,
    /// all released together at the synchronized start. The first task to
    /// panic or be cancelled ends the dinner: the stop flag is raised, every
    /// other task is aborted and the failure is returned.
    pub async fn run(self) -> Result<SimulationReport> {
        if let Ok(handle) = Handle::try_current() {
            if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
                warn!("Running on a current-thread runtime; philosophers will not run in parallel");
            }
        }

        let n = self.config.philosophers;
        let table = TableState::new(
            self.config,
            Arc::clone(&self.sink),
            n as u64 * START_DELAY_PER_PHILOSOPHER_MS,
        );

        info!(
            philosophers = n,
            time_to_die_ms = self.config.time_to_die_ms,
            time_to_eat_ms = self.config.time_to_eat_ms,
            time_to_sleep_ms = self.config.time_to_sleep_ms,
            must_eat = ?self.config.must_eat,
            start_ms = table.start_ms(),
            "Laying the table"
        );

        let mut tasks = JoinSet::new();
        let mut names = HashMap::with_capacity(n + 1);
        for seat in 0..n {
            let handle = tasks.spawn(Philosopher::new(seat, Arc::clone(&table)).dine());
            names.insert(handle.id(), format!("philosopher {}", seat + 1));
        }
        debug!(count = n, "Philosopher tasks spawned");

        if GrimReaper::is_needed(&table) {
            let reaper = GrimReaper::new(Arc::clone(&table));
            let handle = tasks.spawn(async move { Some(reaper.watch().await) });
            names.insert(handle.id(), "grim reaper".to_string());
        }

        let mut outcome = SimulationOutcome::Skipped;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(verdict)) => outcome = verdict,
                Ok(None) => {}
                Err(e) => {
                    let task = names
                        .remove(&e.id())
                        .unwrap_or_else(|| "unknown task".to_string());
                    warn!(%task, error = %e, "Task failed; clearing the table");
                    table.stop().set_stopped();
                    tasks.shutdown().await;
                    return Err(TableError::task_failed(task, e));
                }
            }
        }

        let report = SimulationReport {
            outcome,
            meals: table.meal_counts(),
            must_eat: self.config.must_eat,
            elapsed_ms: table.elapsed_ms(),
        };
        info!(outcome = ?report.outcome, meals = ?report.meals, "Dinner finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusEvent;
    use crate::test_utils::CollectorSink;
    use std::time::Duration;

    /// Panics when one philosopher starts eating
    #[derive(Debug)]
    struct FaultySink {
        philosopher: usize,
        events: CollectorSink,
    }

    impl StatusSink for FaultySink {
        fn emit(&self, event: StatusEvent) {
            if event.philosopher == self.philosopher && event.status == PhilosopherStatus::Eating {
                panic!("sink failure for philosopher {}", self.philosopher);
            }
            self.events.emit(event);
        }
    }

    #[test]
    fn test_table_state_layout() {
        let sink = Arc::new(CollectorSink::new());
        let table = TableState::new(SimulationConfig::new(5, 800, 200, 200), sink, 100);

        assert_eq!(table.forks().len(), 5);
        assert_eq!(table.seats().len(), 5);
        assert_eq!(table.seats()[4].forks(), [4, 0]);
        assert_eq!(table.seats()[1].forks(), [2, 1]);
        assert!(table.start_ms() >= 100);
        for seat in table.seats() {
            assert_eq!(seat.snapshot().last_meal_ms, table.start_ms());
            assert_eq!(seat.meals_eaten(), 0);
        }
        assert!(!table.stop().is_stopped());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let sink = Arc::new(CollectorSink::new());
        let result = Table::new(SimulationConfig::new(0, 800, 200, 200), sink.clone());
        assert!(matches!(result, Err(ref e) if e.is_configuration_error()));

        assert!(Table::new(SimulationConfig::new(251, 800, 200, 200), sink).is_err());
    }

    #[test]
    fn test_report_satisfied_count() {
        let report = SimulationReport {
            outcome: SimulationOutcome::Died {
                philosopher: 2,
                elapsed_ms: 310,
            },
            meals: vec![3, 1, 2, 3],
            must_eat: Some(3),
            elapsed_ms: 312,
        };
        assert_eq!(report.satisfied(), 2);

        let unbounded = SimulationReport {
            must_eat: None,
            ..report
        };
        assert_eq!(unbounded.satisfied(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_quota_skips_everything() {
        let sink = Arc::new(CollectorSink::new());
        let config = SimulationConfig::new(3, 800, 200, 200).with_must_eat(0);
        let table = Table::new(config, sink.clone()).unwrap();

        let report = table.run().await.unwrap();

        assert_eq!(report.outcome, SimulationOutcome::Skipped);
        assert_eq!(report.meals, vec![0, 0, 0]);
        assert_eq!(report.satisfied(), 3);
        assert_eq!(sink.event_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_failure_clears_table_at_once() {
        let sink = Arc::new(FaultySink {
            philosopher: 1,
            events: CollectorSink::new(),
        });
        let table = Table::new(SimulationConfig::new(3, 60_000, 10, 10), sink.clone()).unwrap();

        let started = tokio::time::Instant::now();
        let result = table.run().await;
        let waited = started.elapsed();

        let Err(TableError::TaskFailed { task, source }) = result else {
            panic!("expected a task failure");
        };
        assert_eq!(task, "philosopher 1");
        assert!(source.is_panic());
        // 60ms start delay plus at most one meal of a neighbour, far below time_to_die
        assert!(waited < Duration::from_millis(100), "failure surfaced after {waited:?}");
        assert!(sink.events.deaths().is_empty());
    }
}
