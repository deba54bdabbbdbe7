//! Grim Reaper
//!
//! The monitor task and the only writer of the stop flag. Every
//! `REAPER_POLL_INTERVAL_MS` it scans the seats in index order:
//!
//! 1. A seat whose last meal started `time_to_die` or more ago dies; the scan
//!    stops there, so death wins over completion found in the same pass.
//! 2. If a meal quota is set and every seat has reached it, the dinner is
//!    complete.
//!
//! Either way the flag is raised and the task ends.

use crate::status::PhilosopherStatus;
use crate::table::TableState;
use philo_config::timing::REAPER_POLL_INTERVAL_MS;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// How a dinner ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// Every philosopher ate the required number of meals
    Completed,
    /// A philosopher (1-based) starved `elapsed_ms` after the start
    Died { philosopher: usize, elapsed_ms: u64 },
    /// Nothing ran: zero meals required, or a zero deadline at a lone seat
    Skipped,
}

impl SimulationOutcome {
    pub fn is_death(&self) -> bool {
        matches!(self, SimulationOutcome::Died { .. })
    }
}

/// Result of one pass over the seats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Continue,
    Starved { seat: usize },
    Satisfied,
}

/// Monitor task watching every seat of one table
#[derive(Debug)]
pub struct GrimReaper {
    table: Arc<TableState>,
}

impl GrimReaper {
    pub fn new(table: Arc<TableState>) -> Self {
        Self { table }
    }

    /// The reaper only runs for two or more seats and a non-zero quota
    pub fn is_needed(table: &TableState) -> bool {
        let config = table.config();
        config.philosophers > 1 && !config.nothing_to_eat()
    }

    /// Watch the table until someone dies or everyone has eaten enough
    pub async fn watch(self) -> SimulationOutcome {
        let table = &self.table;
        table.wait_for_start().await;
        debug!(philosophers = table.config().philosophers, "Grim reaper watching");

        let mut ticker = tokio::time::interval(Duration::from_millis(REAPER_POLL_INTERVAL_MS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.scan() {
                Scan::Continue => continue,
                Scan::Starved { seat } => {
                    table.stop().set_stopped();
                    let elapsed_ms = table.elapsed_ms();
                    table.report(seat, PhilosopherStatus::Died);
                    info!(philosopher = seat + 1, elapsed_ms, "Philosopher starved");
                    return SimulationOutcome::Died {
                        philosopher: seat + 1,
                        elapsed_ms,
                    };
                }
                Scan::Satisfied => {
                    table.stop().set_stopped();
                    info!(
                        must_eat = ?table.config().must_eat,
                        elapsed_ms = table.elapsed_ms(),
                        "Every philosopher ate enough"
                    );
                    return SimulationOutcome::Completed;
                }
            }
        }
    }

    /// One pass over the seats in index order
    pub fn scan(&self) -> Scan {
        let table = &self.table;
        let config = table.config();
        let mut all_ate_enough = true;

        for seat in table.seats() {
            let meals = seat.meals().lock();
            let since_last_meal = table.clock().now_ms().saturating_sub(meals.last_meal_ms);
            if since_last_meal >= config.time_to_die_ms {
                return Scan::Starved { seat: seat.index() };
            }
            if let Some(must_eat) = config.must_eat {
                if meals.meals_eaten < must_eat {
                    all_ate_enough = false;
                }
            }
        }

        if config.must_eat.is_some() && all_ate_enough {
            Scan::Satisfied
        } else {
            Scan::Continue
        }
    }
}
