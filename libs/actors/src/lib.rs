//! Dining Philosophers Actors
//!
//! One tokio task per philosopher contends for the forks on either side of
//! its seat while a grim reaper task watches every deadline. The reaper is
//! the only writer of the shared stop flag; everybody else just obeys it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          Table                           │
//! │                                                          │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐  │
//! │  │ Philosopher 0│   │ Philosopher 1│   │ Philosopher 2│  │
//! │  └──┬────────┬──┘   └──┬────────┬──┘   └──┬────────┬──┘  │
//! │     │ fork 0 │ fork 1  │ fork 2 │ fork 1  │ fork 2 │ ... │
//! │  ┌──▼────────▼─────────▼────────▼─────────▼────────▼──┐  │
//! │  │                  ForkSet (ring)                    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  ┌──────────────┐  meal state   ┌─────────────────────┐  │
//! │  │ Grim Reaper  │◄──────────────│ Seat (per-seat lock)│  │
//! │  └──────┬───────┘               └─────────────────────┘  │
//! │         │ set_stopped()                                  │
//! │  ┌──────▼───────┐   is_stopped() / sleep()               │
//! │  │  StopFlag    │──────────────────► every philosopher   │
//! │  └──────────────┘                                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use philo_actors::{ChannelSink, SimulationOutcome, Table};
//! use philo_config::SimulationConfig;
//! use std::sync::Arc;
//!
//! # async fn dinner() -> philo_actors::Result<()> {
//! let (sink, mut events) = ChannelSink::new();
//! let config = SimulationConfig::new(4, 800, 200, 200).with_must_eat(7);
//!
//! let report = Table::new(config, Arc::new(sink))?.run().await?;
//! assert_eq!(report.outcome, SimulationOutcome::Completed);
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{event}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod forks;
pub mod philosopher;
pub mod reaper;
pub mod status;
pub mod stop;
pub mod table;
pub mod test_utils;

pub use clock::Clock;
pub use error::{Result, TableError};
pub use forks::{fork_order, ForkSet, HeldFork};
pub use philosopher::{think_duration_ms, MealState, Philosopher, Seat};
pub use reaper::{GrimReaper, SimulationOutcome};
pub use status::{ChannelSink, PhilosopherStatus, Reporter, StatusEvent, StatusSink};
pub use stop::StopFlag;
pub use table::{SimulationReport, Table, TableState};
