//! Human-readable value formatting shared by the monitors.

use chrono::Local;
use clap::ValueEnum;

/// How the monitors render each tick on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Multi-line human-readable block per tick
    Pretty,
    /// One JSON object per tick
    Json,
}

/// Wall-clock timestamp format used in every emitted line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The current local time, formatted for display.
pub fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Format an environmental value with at least one decimal place.
///
/// Readings are rounded to two decimals at acquisition; a whole-number
/// value still prints as `20.0`, never `20`.
pub fn format_reading(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Convert a byte count to a human-readable string (e.g. KB, MB, GB).
///
/// Divides by 1024 until the magnitude drops below 1024, keeping two
/// decimal places; anything past TB is rendered as PB.
pub fn format_bytes(bytes_count: u64) -> String {
    let mut value = bytes_count as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} PB")
}
