//! sensor-monitor - periodic BME280 readings over I2C or SPI.

use chrono::{DateTime, Local};
use clap::{Parser, ValueEnum};
use pi_utils::format::{format_reading, OutputFormat, TIMESTAMP_FORMAT};
use pi_utils::sensor::{self, BusConfig, ChipSelect};
use pi_utils::{
    parse_address, poll, EnvReading, LoopConfig, PollOutcome, DEFAULT_MONITOR_INTERVAL_SECS,
};

/// Which bus the sensor is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BusKind {
    I2c,
    Spi,
}

#[derive(Parser)]
#[command(name = "sensor-monitor")]
#[command(about = "CLI-based sensor monitor for I2C/SPI sensors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Sensor interface type
    #[arg(long, value_enum, default_value = "i2c")]
    interface: BusKind,

    /// Interval between sensor readings in seconds
    #[arg(long, default_value_t = DEFAULT_MONITOR_INTERVAL_SECS)]
    interval: f64,

    /// Duration to monitor sensor in seconds (default: run until stopped)
    #[arg(long)]
    duration: Option<f64>,

    /// I2C address, hex or decimal
    #[arg(long, value_parser = parse_address, default_value = "0x77")]
    address: u16,

    /// SPI chip select pin
    #[arg(long, value_enum, default_value = "CE0")]
    cs_pin: ChipSelect,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Enable verbose diagnostics
    #[arg(long)]
    verbose: bool,

    /// Enable debug diagnostics
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn bus_config(&self) -> BusConfig {
        match self.interface {
            BusKind::I2c => BusConfig::I2c {
                address: self.address,
            },
            BusKind::Spi => BusConfig::Spi { cs: self.cs_pin },
        }
    }
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

    let bus = cli.bus_config();
    // Initialization failure is fatal; it is never retried.
    let mut device = sensor::open_sensor(&bus)?;
    let label = bus.label();
    let format = cli.format;

    let outcome = poll::run(
        &config,
        // A failed read degrades to a no-data tick; the loop goes on.
        || match device.sample() {
            Ok(reading) => Ok(Some(reading)),
            Err(err) => {
                tracing::warn!("{err}");
                Ok(None)
            }
        },
        |reading, now| print_sensor_data(reading, label, now, format),
    )
    .await?;

    match outcome {
        PollOutcome::DurationReached => println!("Monitoring duration reached. Stopping."),
        PollOutcome::Interrupted => println!("\nMonitoring stopped by user."),
    }

    Ok(())
}

fn print_sensor_data(
    reading: Option<&EnvReading>,
    label: &str,
    now: DateTime<Local>,
    format: OutputFormat,
) {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    match format {
        OutputFormat::Json => {
            let value = match reading {
                Some(data) => serde_json::json!({
                    "timestamp": timestamp,
                    "sensor": label,
                    "reading": data,
                }),
                None => serde_json::json!({
                    "timestamp": timestamp,
                    "sensor": label,
                    "error": "No data received from sensor.",
                }),
            };
            println!("{value}");
        }
        OutputFormat::Pretty => match reading {
            Some(data) => {
                println!("[{timestamp}] {label} Sensor Data:");
                println!("  Temperature: {} \u{b0}C", format_reading(data.temperature));
                println!("  Humidity: {} %", format_reading(data.humidity));
                println!("  Pressure: {} hPa", format_reading(data.pressure));
                println!("{}", "-".repeat(40));
            }
            None => {
                println!("[{timestamp}] Error: No data received from sensor.");
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["sensor-monitor"]).unwrap();
        assert_eq!(cli.interface, BusKind::I2c);
        assert_eq!(cli.interval, DEFAULT_MONITOR_INTERVAL_SECS);
        assert_eq!(cli.address, 0x77);
        assert_eq!(cli.cs_pin, ChipSelect::Ce0);
    }

    #[test]
    fn test_hex_address_parsing() {
        let cli = Cli::try_parse_from(["sensor-monitor", "--address", "0x76"]).unwrap();
        assert_eq!(cli.address, 0x76);

        let cli = Cli::try_parse_from(["sensor-monitor", "--address", "118"]).unwrap();
        assert_eq!(cli.address, 118);

        assert!(Cli::try_parse_from(["sensor-monitor", "--address", "0xZZ"]).is_err());
    }

    #[test]
    fn test_spi_bus_selection() {
        let cli = Cli::try_parse_from([
            "sensor-monitor",
            "--interface",
            "spi",
            "--cs-pin",
            "CE1",
        ])
        .unwrap();
        assert_eq!(cli.bus_config(), BusConfig::Spi { cs: ChipSelect::Ce1 });
    }

    #[test]
    fn test_unknown_cs_pin_rejected() {
        assert!(Cli::try_parse_from(["sensor-monitor", "--cs-pin", "CE9"]).is_err());
    }
}
