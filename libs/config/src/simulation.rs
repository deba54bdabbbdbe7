//! Simulation Configuration Module
//!
//! Provides the immutable parameters of one dinner. Supports building from
//! positional command-line arguments or loading from a TOML file with
//! `PHILO_`-prefixed environment overrides.

use crate::args::{parse_argument, parse_philosopher_count};
use crate::error::{ConfigError, Result};
use crate::limits::table::{MAX_ARGUMENT, MAX_PHILOSOPHERS};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Parameters of a single simulation run
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of philosophers (and forks) at the table
    pub philosophers: usize,

    /// Milliseconds a philosopher survives after the start of its last meal
    pub time_to_die_ms: u64,

    /// Milliseconds spent eating
    pub time_to_eat_ms: u64,

    /// Milliseconds spent sleeping
    pub time_to_sleep_ms: u64,

    /// Meals every philosopher must eat before the dinner ends; unbounded when absent
    pub must_eat: Option<u64>,
}

impl SimulationConfig {
    /// Create a configuration without a meal quota
    pub fn new(
        philosophers: usize,
        time_to_die_ms: u64,
        time_to_eat_ms: u64,
        time_to_sleep_ms: u64,
    ) -> Self {
        Self {
            philosophers,
            time_to_die_ms,
            time_to_eat_ms,
            time_to_sleep_ms,
            must_eat: None,
        }
    }

    /// Set the meal quota
    pub fn with_must_eat(mut self, must_eat: u64) -> Self {
        self.must_eat = Some(must_eat);
        self
    }

    /// Build from the positional arguments (program name excluded)
    ///
    /// Expects `number_of_philosophers time_to_die time_to_eat time_to_sleep
    /// [number_of_times_each_philosopher_must_eat]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() < 4 || args.len() > 5 {
            return Err(ConfigError::Usage { given: args.len() });
        }

        let philosophers = parse_philosopher_count(args[0].as_ref())?;
        let time_to_die_ms = parse_argument(args[1].as_ref())?;
        let time_to_eat_ms = parse_argument(args[2].as_ref())?;
        let time_to_sleep_ms = parse_argument(args[3].as_ref())?;
        let must_eat = args.get(4).map(|arg| parse_argument(arg.as_ref())).transpose()?;

        let config = Self {
            philosophers,
            time_to_die_ms,
            time_to_eat_ms,
            time_to_sleep_ms,
            must_eat,
        };
        debug!(?config, "Parsed simulation arguments");
        Ok(config)
    }

    /// Load configuration from a TOML file with environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading simulation config: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path).required(true))
            // Override with environment variables (PHILO_ prefix)
            .add_source(Environment::with_prefix("PHILO").try_parsing(true))
            .build()
            .map_err(|e| ConfigError::load(format!("failed to build from {}", path.display()), e))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::load("failed to deserialize simulation config", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Check every field against the accepted ranges
    pub fn validate(&self) -> Result<()> {
        if self.philosophers == 0 || self.philosophers > MAX_PHILOSOPHERS {
            return Err(ConfigError::PhilosopherCount {
                count: self.philosophers as u64,
            });
        }

        let fields = [
            ("time_to_die_ms", Some(self.time_to_die_ms)),
            ("time_to_eat_ms", Some(self.time_to_eat_ms)),
            ("time_to_sleep_ms", Some(self.time_to_sleep_ms)),
            ("must_eat", self.must_eat),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value > MAX_ARGUMENT {
                    return Err(ConfigError::OutOfRange { field, value });
                }
            }
        }
        Ok(())
    }

    pub fn time_to_die(&self) -> Duration {
        Duration::from_millis(self.time_to_die_ms)
    }

    pub fn time_to_eat(&self) -> Duration {
        Duration::from_millis(self.time_to_eat_ms)
    }

    pub fn time_to_sleep(&self) -> Duration {
        Duration::from_millis(self.time_to_sleep_ms)
    }

    /// A quota of zero means there is nothing to simulate
    pub fn nothing_to_eat(&self) -> bool {
        self.must_eat == Some(0)
    }
}
