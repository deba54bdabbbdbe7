//! Table Error Types
//!
//! Failures that abort a whole dinner. Nothing here is retried: a rejected
//! configuration or a task that could not run to completion ends the run.

use philo_config::ConfigError;
use thiserror::Error;
use tokio::task::JoinError;

/// Main table error type
#[derive(Error, Debug)]
pub enum TableError {
    /// Configuration rejected before any task was spawned
    #[error("Configuration error: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// A philosopher or reaper task panicked or was cancelled
    #[error("Task failure: {task}: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: JoinError,
    },
}

/// Result type alias for table operations
pub type Result<T> = std::result::Result<T, TableError>;

impl TableError {
    /// Create a task failure error
    pub fn task_failed(task: impl Into<String>, source: JoinError) -> Self {
        Self::TaskFailed {
            task: task.into(),
            source,
        }
    }

    /// Check if the failure happened before the simulation started
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, TableError::InvalidConfiguration(_))
    }
}
