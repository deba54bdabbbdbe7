//! Philosopher State Machine
//!
//! Each philosopher runs as its own task:
//!
//! ```text
//! THINKING ──► WAITING_FORK_1 ──► WAITING_FORK_2 ──► EATING ──► SLEEPING ──┐
//!    ▲                                                                     │
//!    └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A philosopher never declares its own death; it leaves the loop once the
//! grim reaper raises the stop flag. The lone philosopher is the exception:
//! with a single fork it can never eat, so it waits out `time_to_die` holding
//! that fork and announces its own death.

use crate::reaper::SimulationOutcome;
use crate::status::PhilosopherStatus;
use crate::table::TableState;
use parking_lot::Mutex;
use philo_config::timing::{STAGGER_MIN_MS, THINK_CEILING_MS, THINK_FALLBACK_MS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Meal bookkeeping shared between a philosopher (writer) and the reaper (reader)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MealState {
    /// Clock reading at the start of the latest meal
    pub last_meal_ms: u64,
    /// Completed meals
    pub meals_eaten: u64,
}

/// A place at the table: identity, forks, and guarded meal state
#[derive(Debug)]
pub struct Seat {
    index: usize,
    forks: [usize; 2],
    meals: Mutex<MealState>,
}

impl Seat {
    pub fn new(index: usize, forks: [usize; 2], start_ms: u64) -> Self {
        Self {
            index,
            forks,
            meals: Mutex::new(MealState {
                last_meal_ms: start_ms,
                meals_eaten: 0,
            }),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Fork indices in acquisition order
    pub fn forks(&self) -> [usize; 2] {
        self.forks
    }

    /// Consistent copy of the meal state
    pub fn snapshot(&self) -> MealState {
        *self.meals.lock()
    }

    pub fn meals_eaten(&self) -> u64 {
        self.meals.lock().meals_eaten
    }

    pub(crate) fn meals(&self) -> &Mutex<MealState> {
        &self.meals
    }
}

/// Think duration in milliseconds
///
/// Aims to come back to the forks roughly halfway through the remaining
/// safety margin: `(time_to_die - since_last_meal - time_to_eat) / 2`,
/// floored at zero. A silent stagger think never lasts less than
/// `STAGGER_MIN_MS`, and anything above `THINK_CEILING_MS` falls back to
/// `THINK_FALLBACK_MS`.
pub fn think_duration_ms(
    time_to_die_ms: u64,
    since_last_meal_ms: u64,
    time_to_eat_ms: u64,
    silent: bool,
) -> u64 {
    let margin = time_to_die_ms as i64 - since_last_meal_ms as i64 - time_to_eat_ms as i64;
    let mut think = (margin / 2).max(0);
    if think == 0 && silent {
        think = STAGGER_MIN_MS;
    }
    if think > THINK_CEILING_MS {
        think = THINK_FALLBACK_MS;
    }
    think as u64
}

/// Task driving one seat through the dinner
#[derive(Debug)]
pub struct Philosopher {
    seat: usize,
    table: Arc<TableState>,
}

impl Philosopher {
    pub fn new(seat: usize, table: Arc<TableState>) -> Self {
        Self { seat, table }
    }

    fn seat(&self) -> &Seat {
        &self.table.seats()[self.seat]
    }

    /// Run the philosopher to completion
    ///
    /// Returns an outcome only for the lone philosopher, who announces its
    /// own death; otherwise the reaper decides how the dinner ended.
    pub async fn dine(self) -> Option<SimulationOutcome> {
        let config = *self.table.config();
        if config.nothing_to_eat() {
            return None;
        }

        let start_ms = self.table.start_ms();
        self.seat().meals().lock().last_meal_ms = start_ms;
        self.table.wait_for_start().await;

        if config.time_to_die_ms == 0 {
            debug!(seat = self.seat, "Deadline already passed at start; leaving the table");
            return None;
        }

        if config.philosophers == 1 {
            return Some(self.dine_alone().await);
        }

        if self.seat % 2 == 1 {
            self.think(true).await;
        }

        while !self.table.stop().is_stopped() {
            self.eat_and_sleep().await;
            self.think(false).await;
        }

        trace!(seat = self.seat, meals = self.seat().meals_eaten(), "Philosopher left the table");
        None
    }

    /// Take the only fork, wait out the deadline, die
    async fn dine_alone(&self) -> SimulationOutcome {
        let table = &self.table;
        let [fork, _] = self.seat().forks();

        let held = table.forks().acquire(fork, self.seat).await;
        table.report(self.seat, PhilosopherStatus::TookFirstFork { fork });
        table.stop().sleep(table.config().time_to_die()).await;
        let elapsed_ms = table.elapsed_ms();
        table.report(self.seat, PhilosopherStatus::Died);
        drop(held);

        debug!(seat = self.seat, elapsed_ms, "Lone philosopher starved");
        SimulationOutcome::Died {
            philosopher: self.seat + 1,
            elapsed_ms,
        }
    }

    async fn eat_and_sleep(&self) {
        let table = &self.table;
        let seat = self.seat();
        let [first, second] = seat.forks();

        let first_fork = table.forks().acquire(first, self.seat).await;
        table.report(self.seat, PhilosopherStatus::TookFirstFork { fork: first });
        let second_fork = table.forks().acquire(second, self.seat).await;
        table.report(self.seat, PhilosopherStatus::TookSecondFork { fork: second });

        table.report(self.seat, PhilosopherStatus::Eating);
        seat.meals().lock().last_meal_ms = table.clock().now_ms();
        table.stop().sleep(table.config().time_to_eat()).await;

        if !table.stop().is_stopped() {
            seat.meals().lock().meals_eaten += 1;
        }

        table.report(self.seat, PhilosopherStatus::Sleeping);
        drop(second_fork);
        drop(first_fork);

        table.stop().sleep(table.config().time_to_sleep()).await;
    }

    async fn think(&self, silent: bool) {
        let table = &self.table;
        let config = table.config();

        let think_ms = {
            let meals = self.seat().meals().lock();
            let since_last_meal = table.clock().now_ms().saturating_sub(meals.last_meal_ms);
            think_duration_ms(config.time_to_die_ms, since_last_meal, config.time_to_eat_ms, silent)
        };

        if !silent {
            table.report(self.seat, PhilosopherStatus::Thinking);
        }
        table.stop().sleep(Duration::from_millis(think_ms)).await;
    }
}
