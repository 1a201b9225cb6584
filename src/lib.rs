//! # pi-utils - Raspberry Pi command-line utilities
//!
//! Four small, independent tools sharing one library:
//!
//! - **cam-capture**: one-shot still capture via libcamera
//! - **sensor-logger**: periodic simulated readings to a log file
//! - **net-monitor**: periodic per-interface network counters
//! - **sensor-monitor**: periodic BME280 readings over I2C or SPI
//!
//! The periodic tools are all built on the same bounded polling loop:
//! read, emit, sleep for a fixed interval, until an optional duration
//! elapses or the user presses Ctrl-C.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pi_utils::{poll, readings::EnvReading};
//!
//! #[tokio::main]
//! async fn main() -> pi_utils::Result<()> {
//!     let config = poll::LoopConfig::new(2.0, Some(10.0));
//!     poll::run(
//!         &config,
//!         || Ok(Some(EnvReading::simulate())),
//!         |reading, ts| println!("[{ts}] {reading:?}"),
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod error;
pub mod format;
pub mod logfile;
pub mod net;
pub mod poll;
pub mod readings;
pub mod sensor;

// Re-export public API
pub use error::{Result, UtilError};
pub use format::format_bytes;
pub use logfile::{LogLevel, LogSink};
pub use poll::{LoopConfig, PollOutcome};
pub use readings::{EnvReading, InterfaceCounters, NetReading};

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The default logger sampling interval in seconds
pub const DEFAULT_LOGGER_INTERVAL_SECS: f64 = 5.0;

/// The default monitor sampling interval in seconds
pub const DEFAULT_MONITOR_INTERVAL_SECS: f64 = 2.0;

/// The default log file for the sensor-logger utility
pub const DEFAULT_LOG_FILE: &str = "sensor_data.log";

/// The default BME280 I2C address
pub const DEFAULT_I2C_ADDRESS: u16 = 0x77;

/// Initialize stderr diagnostics for a binary.
///
/// Separate from the sensor-logger's data sink: this is internal tracing
/// only, kept off stdout so it never mixes into the per-tick output.
pub fn init_diagnostics(verbose: bool, debug: bool) -> anyhow::Result<()> {
    let level = if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Parse a bus address given in hex (`0x77`) or decimal (`119`).
pub fn parse_address(value: &str) -> std::result::Result<u16, String> {
    let parsed = if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        value.parse::<u16>()
    };
    parsed.map_err(|_| format!("invalid address '{value}' (expected hex like 0x77 or decimal)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x77").unwrap(), 0x77);
        assert_eq!(parse_address("0X76").unwrap(), 0x76);
        assert_eq!(parse_address("119").unwrap(), 119);
        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("").is_err());
    }
}
