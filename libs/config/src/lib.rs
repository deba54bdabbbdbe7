//! # Dining Philosophers Configuration
//!
//! Validated simulation parameters and the constants shared by the table,
//! the philosophers and the grim reaper.
//!
//! ## Features
//!
//! - **Argument Validation**: digit-only numeric arguments, philosopher count range
//! - **File Loading**: TOML configuration with `PHILO_` environment overrides
//! - **Shared Limits**: start barrier spacing, reaper polling, think clamps
//!
//! ## Usage
//!
//! ```rust
//! use philo_config::SimulationConfig;
//!
//! let args: Vec<String> = ["4", "800", "200", "200", "7"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let config = SimulationConfig::from_args(&args).unwrap();
//!
//! assert_eq!(config.philosophers, 4);
//! assert_eq!(config.must_eat, Some(7));
//! ```

pub mod args;
pub mod error;
pub mod limits;
pub mod simulation;

// Re-export commonly used types
pub use error::{ConfigError, Result};
pub use limits::*;
pub use simulation::SimulationConfig;
