//! # Dining Philosophers Console
//!
//! Console front end for the simulation: renders status events to a writer
//! in one of three formats and prints the end-of-dinner summary.
//!
//! ## Formats
//!
//! - **plain**: `<elapsed_ms> <philosopher> <event>`
//! - **debug**: right-aligned timestamps, zero-padded ids, ANSI colors, and
//!   the index of the fork taken
//! - **json**: one serialized event per line

use clap::ValueEnum;
use parking_lot::Mutex;
use philo_actors::{PhilosopherStatus, SimulationReport, StatusEvent, StatusSink};
use std::fmt;
use std::io::Write;
use tracing::warn;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_RED: &str = "\x1b[31m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_PURPLE: &str = "\x1b[35m";
const COLOR_CYAN: &str = "\x1b[36m";

/// How events are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Debug,
    Json,
}

/// How diagnostics on stderr are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Debug => "debug",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Render a single event (without trailing newline)
pub fn render(event: &StatusEvent, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => event.to_string(),
        OutputFormat::Debug => {
            let color = match event.status {
                PhilosopherStatus::Died => COLOR_RED,
                PhilosopherStatus::Eating => COLOR_GREEN,
                PhilosopherStatus::Sleeping | PhilosopherStatus::Thinking => COLOR_CYAN,
                PhilosopherStatus::TookFirstFork { .. }
                | PhilosopherStatus::TookSecondFork { .. } => COLOR_PURPLE,
            };
            let mut line = format!(
                "[{:>10}]\t{color}{:03}\t{}{COLOR_RESET}",
                event.elapsed_ms, event.philosopher, event.status
            );
            if let Some(fork) = event.status.fork() {
                line.push_str(&format!(": fork [{fork}]"));
            }
            line
        }
        // Plain data types; serialization cannot fail
        OutputFormat::Json => serde_json::to_string(event).unwrap_or_else(|_| event.to_string()),
    }
}

/// Summary line for dinners with a meal quota
pub fn summary_line(report: &SimulationReport) -> Option<String> {
    report.must_eat.map(|must_eat| {
        format!(
            "{}/{} philosophers had at least {} meals.",
            report.satisfied(),
            report.meals.len(),
            must_eat
        )
    })
}

/// Sink writing rendered events to any `Write` (stdout in the binary)
pub struct ConsoleSink<W: Write + Send> {
    writer: Mutex<W>,
    format: OutputFormat,
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> fmt::Debug for ConsoleSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink").field("format", &self.format).finish()
    }
}

impl<W: Write + Send> StatusSink for ConsoleSink<W> {
    fn emit(&self, event: StatusEvent) {
        let line = render(&event, self.format);
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            warn!(error = %e, "Failed to write status event");
        }
    }
}
