//! Reading types produced once per tick and discarded after emission.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One environmental sample: temperature, humidity, barometric pressure.
///
/// Values are rounded to two decimal places at acquisition time, not at
/// each display call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvReading {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Barometric pressure in hPa
    pub pressure: f64,
}

impl EnvReading {
    /// Build a reading from raw values, rounding each to two decimals.
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature: round2(temperature),
            humidity: round2(humidity),
            pressure: round2(pressure),
        }
    }

    /// Draw a simulated reading, uniform within fixed ranges.
    ///
    /// The ranges (15-35 C, 30-90 %, 900-1100 hPa) are arbitrary and have
    /// no relation to real-world physics. Simulation never fails.
    pub fn simulate() -> Self {
        let mut rng = rand::rng();
        Self::new(
            rng.random_range(15.0..=35.0),
            rng.random_range(30.0..=90.0),
            rng.random_range(900.0..=1100.0),
        )
    }
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Traffic counters for one network interface at one sample time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    /// Bytes transmitted
    pub bytes_sent: u64,
    /// Bytes received
    pub bytes_recv: u64,
    /// Packets transmitted
    pub packets_sent: u64,
    /// Packets received
    pub packets_recv: u64,
    /// Inbound errors
    pub errors_in: u64,
    /// Outbound errors
    pub errors_out: u64,
    /// Inbound packets dropped
    pub dropped_in: u64,
    /// Outbound packets dropped
    pub dropped_out: u64,
}

/// Counters for all sampled interfaces, keyed by interface name.
pub type NetReading = BTreeMap<String, InterfaceCounters>;
