//! Integration tests for full dinners
//!
//! Most scenarios run on tokio's paused clock, so the timings below are
//! exact: sleeps complete on the millisecond and the reaper ticks every
//! virtual millisecond. Two smoke tests run on the real clock of a
//! multi-threaded runtime.

use philo_actors::test_utils::CollectorSink;
use philo_actors::{
    fork_order, PhilosopherStatus, SimulationOutcome, SimulationReport, StatusEvent, Table,
};
use philo_config::SimulationConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

async fn dine(config: SimulationConfig) -> (SimulationReport, Arc<CollectorSink>) {
    let sink = Arc::new(CollectorSink::new());
    let table = Table::new(config, sink.clone()).unwrap();
    let report = timeout(Duration::from_secs(600), table.run())
        .await
        .expect("dinner never ended")
        .unwrap();
    (report, sink)
}

/// Per philosopher, events must follow the state machine from the first fork onwards
fn assert_follows_state_machine(events: &[StatusEvent], philosophers: usize) {
    for philosopher in 1..=philosophers {
        let [first, second] = fork_order(philosopher - 1, philosophers);
        let cycle = [
            PhilosopherStatus::TookFirstFork { fork: first },
            PhilosopherStatus::TookSecondFork { fork: second },
            PhilosopherStatus::Eating,
            PhilosopherStatus::Sleeping,
            PhilosopherStatus::Thinking,
        ];

        let own: Vec<_> = events
            .iter()
            .filter(|e| e.philosopher == philosopher && !e.status.is_death())
            .map(|e| e.status)
            .collect();
        for (step, status) in own.iter().enumerate() {
            assert_eq!(
                *status,
                cycle[step % cycle.len()],
                "philosopher {philosopher} out of order at step {step}"
            );
        }
    }
}

/// Replay fork takes and releases; no fork may be taken while held
fn assert_forks_exclusive(events: &[StatusEvent]) {
    let mut holders: HashMap<usize, usize> = HashMap::new();
    for event in events {
        match event.status {
            PhilosopherStatus::TookFirstFork { fork }
            | PhilosopherStatus::TookSecondFork { fork } => {
                if let Some(holder) = holders.insert(fork, event.philosopher) {
                    panic!(
                        "philosopher {} took fork {fork} held by {holder} at {}ms",
                        event.philosopher, event.elapsed_ms
                    );
                }
            }
            PhilosopherStatus::Sleeping => holders.retain(|_, holder| *holder != event.philosopher),
            _ => {}
        }
    }
}

fn assert_time_ordered(events: &[StatusEvent]) {
    for pair in events.windows(2) {
        assert!(pair[0].elapsed_ms <= pair[1].elapsed_ms, "{pair:?} out of order");
    }
}

#[tokio::test(start_paused = true)]
async fn test_four_philosophers_eat_exactly_seven_meals() {
    let (report, sink) = dine(SimulationConfig::new(4, 800, 200, 200).with_must_eat(7)).await;

    assert_eq!(report.outcome, SimulationOutcome::Completed);
    assert_eq!(report.meals, vec![7, 7, 7, 7]);
    assert_eq!(report.satisfied(), 4);
    assert!(sink.deaths().is_empty());

    let events = sink.events();
    assert_time_ordered(&events);
    assert_follows_state_machine(&events, 4);
    assert_forks_exclusive(&events);
}

#[tokio::test(start_paused = true)]
async fn test_lone_philosopher_starves_holding_one_fork() {
    let (report, sink) = dine(SimulationConfig::new(1, 300, 100, 100)).await;

    assert_eq!(
        report.outcome,
        SimulationOutcome::Died {
            philosopher: 1,
            elapsed_ms: 300
        }
    );
    assert_eq!(report.meals, vec![0]);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].status, PhilosopherStatus::TookFirstFork { fork: 0 });
    assert_eq!(events[0].elapsed_ms, 0);
    assert_eq!(events[1].status, PhilosopherStatus::Died);
    assert_eq!(events[1].elapsed_ms, 300);
}

#[tokio::test(start_paused = true)]
async fn test_lone_philosopher_ignores_meal_quota() {
    let (report, sink) = dine(SimulationConfig::new(1, 200, 100, 100).with_must_eat(3)).await;

    assert!(report.outcome.is_death());
    assert_eq!(report.satisfied(), 0);
    assert_eq!(sink.deaths().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_tight_deadline_kills_a_philosopher() {
    let (report, sink) = dine(SimulationConfig::new(5, 310, 200, 100)).await;

    let SimulationOutcome::Died { philosopher, elapsed_ms } = report.outcome else {
        panic!("expected a death, got {:?}", report.outcome);
    };
    assert!((1..=5).contains(&philosopher));
    assert!(elapsed_ms >= 310);

    let events = sink.events();
    let deaths = sink.deaths();
    assert_eq!(deaths.len(), 1);
    // The death announcement is the final line; nobody speaks after it
    assert_eq!(events.last(), deaths.last());
    assert_eq!(deaths[0].philosopher, philosopher);

    assert_time_ordered(&events);
    assert_follows_state_machine(&events, 5);
    assert_forks_exclusive(&events);
}

#[tokio::test(start_paused = true)]
async fn test_death_time_matches_deadline() {
    // Philosopher 1 starts eating at 0 and cannot finish before its deadline
    let (report, sink) = dine(SimulationConfig::new(2, 100, 200, 100)).await;

    assert_eq!(
        report.outcome,
        SimulationOutcome::Died {
            philosopher: 1,
            elapsed_ms: 100
        }
    );
    assert_eq!(report.meals, vec![0, 0]);

    let death = sink.deaths()[0];
    assert_eq!(death.elapsed_ms, 100);
    // Eating was interrupted by the stop flag, so no meal was counted and
    // no further eating was announced
    let eating_after_death = sink
        .events()
        .iter()
        .filter(|e| e.status == PhilosopherStatus::Eating && e.elapsed_ms > death.elapsed_ms)
        .count();
    assert_eq!(eating_after_death, 0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_deadline_dies_at_start() {
    let (report, sink) = dine(SimulationConfig::new(3, 0, 100, 100)).await;

    assert_eq!(
        report.outcome,
        SimulationOutcome::Died {
            philosopher: 1,
            elapsed_ms: 0
        }
    );
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].status.is_death());
}

#[tokio::test(start_paused = true)]
async fn test_zero_deadline_lone_philosopher_does_nothing() {
    let (report, sink) = dine(SimulationConfig::new(1, 0, 100, 100)).await;

    assert_eq!(report.outcome, SimulationOutcome::Skipped);
    assert_eq!(sink.event_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_deadlock_for_various_table_sizes() {
    for philosophers in [2, 3, 4, 5, 7, 10] {
        let config = SimulationConfig::new(philosophers, 800, 100, 100).with_must_eat(3);
        let (report, sink) = dine(config).await;

        assert_eq!(
            report.outcome,
            SimulationOutcome::Completed,
            "{philosophers} philosophers did not finish"
        );
        assert!(report.meals.iter().all(|&meals| meals >= 3), "{:?}", report.meals);

        let events = sink.events();
        assert_follows_state_machine(&events, philosophers);
        assert_forks_exclusive(&events);
    }
}

#[tokio::test(start_paused = true)]
async fn test_meals_never_exceed_announced_meals() {
    let (report, sink) = dine(SimulationConfig::new(5, 600, 150, 150).with_must_eat(4)).await;

    for (seat, &meals) in report.meals.iter().enumerate() {
        let announced = sink
            .events_for(seat + 1)
            .iter()
            .filter(|e| e.status == PhilosopherStatus::Eating)
            .count() as u64;
        assert!(meals <= announced, "seat {seat}: {meals} meals, {announced} announced");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_real_clock_lone_philosopher() {
    let (report, _) = dine(SimulationConfig::new(1, 100, 50, 50)).await;

    let SimulationOutcome::Died { elapsed_ms, .. } = report.outcome else {
        panic!("expected a death, got {:?}", report.outcome);
    };
    assert!((100..150).contains(&elapsed_ms), "died at {elapsed_ms}ms");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_real_clock_dinner_completes() {
    let (report, sink) = dine(SimulationConfig::new(4, 800, 100, 100).with_must_eat(2)).await;

    assert_eq!(report.outcome, SimulationOutcome::Completed);
    assert!(report.meals.iter().all(|&meals| meals >= 2));
    assert!(sink.deaths().is_empty());
    assert_forks_exclusive(&sink.events());
}
