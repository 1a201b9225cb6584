//! sensor-logger - periodic (simulated) sensor readings to a log file.

use clap::Parser;
use pi_utils::format::format_reading;
use pi_utils::{
    poll, EnvReading, LogLevel, LogSink, LoopConfig, PollOutcome, DEFAULT_LOGGER_INTERVAL_SECS,
    DEFAULT_LOG_FILE,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensor-logger")]
#[command(about = "CLI-based file logger for periodic sensor data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Interval between sensor readings in seconds
    #[arg(long, default_value_t = DEFAULT_LOGGER_INTERVAL_SECS)]
    interval: f64,

    /// Duration to log data in seconds (default: run until stopped)
    #[arg(long)]
    duration: Option<f64>,

    /// Logging level for the data log
    #[arg(long, value_enum, ignore_case = true, default_value = "INFO")]
    log_level: LogLevel,

    /// Append to existing log file instead of overwriting
    #[arg(long)]
    append: bool,

    /// Enable verbose diagnostics
    #[arg(long)]
    verbose: bool,

    /// Enable debug diagnostics
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    pi_utils::init_diagnostics(cli.verbose, cli.debug)?;

    let config = LoopConfig::new(cli.interval, cli.duration);
    config.validate()?;

    let mut sink = LogSink::create(&cli.log_file, cli.log_level, cli.append)?;
    sink.info("Starting sensor data logging...")?;

    let outcome = poll::run(
        &config,
        // Simulated acquisition never fails; every tick has data.
        || Ok(Some(EnvReading::simulate())),
        |reading, _ts| {
            if let Some(data) = reading {
                let line = format!(
                    "Sensor Data - Temp: {}\u{b0}C, Humidity: {}%, Pressure: {}hPa",
                    format_reading(data.temperature),
                    format_reading(data.humidity),
                    format_reading(data.pressure)
                );
                if let Err(err) = sink.info(&line) {
                    tracing::error!("failed to write log line: {err}");
                }
            }
        },
    )
    .await?;

    match outcome {
        PollOutcome::DurationReached => sink.info("Logging duration reached. Stopping.")?,
        PollOutcome::Interrupted => sink.info("Logging stopped by user.")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["sensor-logger"]).unwrap();
        assert_eq!(cli.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(cli.interval, DEFAULT_LOGGER_INTERVAL_SECS);
        assert_eq!(cli.duration, None);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(!cli.append);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "sensor-logger",
            "--log-file",
            "/tmp/readings.log",
            "--interval",
            "0.5",
            "--duration",
            "30",
            "--log-level",
            "DEBUG",
            "--append",
        ])
        .unwrap();
        assert_eq!(cli.log_file, PathBuf::from("/tmp/readings.log"));
        assert_eq!(cli.interval, 0.5);
        assert_eq!(cli.duration, Some(30.0));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(cli.append);
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let cli = Cli::try_parse_from(["sensor-logger", "--log-level", "warning"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warning);
    }
}
