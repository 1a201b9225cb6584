//! net-monitor - periodic per-interface network counters on stdout.

use chrono::{DateTime, Local};
use clap::Parser;
use pi_utils::format::{format_bytes, OutputFormat, TIMESTAMP_FORMAT};
use pi_utils::net::NetSampler;
use pi_utils::{poll, LoopConfig, NetReading, PollOutcome, DEFAULT_MONITOR_INTERVAL_SECS};

#[derive(Parser)]
#[command(name = "net-monitor")]
#[command(about = "CLI-based network monitor for Raspberry Pi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Network interface to monitor (e.g. eth0, wlan0; default: all interfaces)
    #[arg(long)]
    interface: Option<String>,

    /// Interval between updates in seconds
    #[arg(long, default_value_t = DEFAULT_MONITOR_INTERVAL_SECS)]
    interval: f64,

    /// Duration to monitor in seconds (default: run until stopped)
    #[arg(long)]
    duration: Option<f64>,

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

    // Fails here, before the loop, when the requested interface does not
    // exist; the message lists the interfaces that do.
    let mut sampler = NetSampler::new(cli.interface.clone())?;
    let format = cli.format;

    let outcome = poll::run(
        &config,
        || sampler.sample(),
        |stats, now| print_network_stats(stats, now, format),
    )
    .await?;

    match outcome {
        PollOutcome::DurationReached => println!("Monitoring duration reached. Stopping."),
        PollOutcome::Interrupted => println!("\nMonitoring stopped by user."),
    }

    Ok(())
}

fn print_network_stats(stats: Option<&NetReading>, now: DateTime<Local>, format: OutputFormat) {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let stats = stats.filter(|s| !s.is_empty());

    match format {
        OutputFormat::Json => {
            let value = match stats {
                Some(stats) => serde_json::json!({
                    "timestamp": timestamp,
                    "interfaces": stats,
                }),
                None => serde_json::json!({
                    "timestamp": timestamp,
                    "error": "No network data available.",
                }),
            };
            println!("{value}");
        }
        OutputFormat::Pretty => {
            let Some(stats) = stats else {
                println!("[{timestamp}] Error: No network data available.");
                return;
            };
            println!("[{timestamp}] Network Statistics:");
            for (iface, data) in stats {
                println!("  Interface: {iface}");
                println!("    Bytes Sent: {}", format_bytes(data.bytes_sent));
                println!("    Bytes Received: {}", format_bytes(data.bytes_recv));
                println!("    Packets Sent: {}", data.packets_sent);
                println!("    Packets Received: {}", data.packets_recv);
                println!("    Errors In: {}", data.errors_in);
                println!("    Errors Out: {}", data.errors_out);
                println!("    Dropped In: {}", data.dropped_in);
                println!("    Dropped Out: {}", data.dropped_out);
            }
            println!("{}", "-".repeat(50));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["net-monitor"]).unwrap();
        assert_eq!(cli.interface, None);
        assert_eq!(cli.interval, DEFAULT_MONITOR_INTERVAL_SECS);
        assert_eq!(cli.duration, None);
        assert_eq!(cli.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "net-monitor",
            "--interface",
            "wlan0",
            "--interval",
            "1.5",
            "--duration",
            "10",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.interface.as_deref(), Some("wlan0"));
        assert_eq!(cli.interval, 1.5);
        assert_eq!(cli.duration, Some(10.0));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
