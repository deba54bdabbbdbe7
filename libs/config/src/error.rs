//! Configuration Error Types

use crate::limits::table::{MAX_ARGUMENT, MAX_PHILOSOPHERS};
use thiserror::Error;

/// Configuration and argument validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Wrong number of positional arguments
    #[error(
        "usage: philo <number_of_philosophers> <time_to_die> <time_to_eat> \
         <time_to_sleep> [number_of_times_each_philosopher_must_eat] (got {given} arguments)"
    )]
    Usage { given: usize },

    /// Argument is not a digit-only string within range
    #[error(
        "invalid input: {arg}: not a valid unsigned integer between 0 and {max}",
        max = MAX_ARGUMENT
    )]
    NotANumber { arg: String },

    /// Philosopher count outside the accepted range
    #[error(
        "invalid input: there must be between 1 and {max} philosophers (got {count})",
        max = MAX_PHILOSOPHERS
    )]
    PhilosopherCount { count: u64 },

    /// A millisecond value exceeds the accepted maximum
    #[error("invalid input: {field} = {value} exceeds {max}", max = MAX_ARGUMENT)]
    OutOfRange { field: &'static str, value: u64 },

    /// File or environment source could not be read or deserialized
    #[error("failed to load configuration: {message}")]
    Load {
        message: String,
        #[source]
        source: config_crate::ConfigError,
    },
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Create a not-a-number error for the offending argument
    pub fn not_a_number(arg: impl Into<String>) -> Self {
        Self::NotANumber { arg: arg.into() }
    }

    /// Wrap a `config` crate failure
    pub fn load(message: impl Into<String>, source: config_crate::ConfigError) -> Self {
        Self::Load {
            message: message.into(),
            source,
        }
    }
}
