//! Dining philosophers entry point
//!
//! Usage:
//!   philo 5 800 200 200
//!   philo 4 410 200 200 10 --format debug --summary
//!   philo --config config/dinner.toml

use anyhow::{Context, Result};
use clap::Parser;
use philo_actors::Table;
use philo_config::SimulationConfig;
use philo_dining::{summary_line, ConsoleSink, LogFormat, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "philo")]
#[command(about = "Dining philosophers simulation")]
#[command(version)]
struct Args {
    /// number_of_philosophers time_to_die time_to_eat time_to_sleep
    /// [number_of_times_each_philosopher_must_eat]
    #[arg(value_name = "ARGS")]
    positional: Vec<String>,

    /// Path to a TOML configuration file (instead of positional arguments)
    #[arg(short, long, conflicts_with = "positional")]
    config: Option<PathBuf>,

    /// Event output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Print how many philosophers reached the meal quota
    #[arg(long)]
    summary: bool,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Diagnostics format on stderr
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_format);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("philosophers: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::from_args(&args.positional)?,
    };
    info!(?config, format = %args.format, "Configuration accepted");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("philosopher")
        .build()
        .context("Could not create the task runtime")?;

    let sink = Arc::new(ConsoleSink::new(std::io::stdout(), args.format));
    let table = Table::new(config, sink)?;
    let report = runtime.block_on(table.run())?;

    if args.summary {
        if let Some(line) = summary_line(&report) {
            println!("{line}");
        }
    }

    info!(outcome = ?report.outcome, elapsed_ms = report.elapsed_ms, "Simulation finished");
    Ok(())
}

fn init_logging(level: &str, format: LogFormat) {
    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
