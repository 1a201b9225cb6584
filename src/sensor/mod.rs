//! Environmental sensor access over I2C or SPI.
//!
//! The BME280 driver is bus-agnostic; the rppal-backed buses are gated
//! behind the `hardware` feature so the crate still builds on non-Pi
//! hosts.

pub mod bme280;

pub use bme280::Bme280;

use crate::error::Result;
use crate::readings::EnvReading;
use clap::ValueEnum;

/// A sensor that produces one environmental reading per call.
pub trait EnvSensor {
    /// Read temperature, humidity and pressure once.
    fn sample(&mut self) -> Result<EnvReading>;
}

/// Supported SPI chip-select lines on the Pi header.
///
/// An explicit set: unknown names are rejected at argument parsing,
/// not discovered at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum ChipSelect {
    Ce0,
    Ce1,
    Ce2,
}

/// Which bus the sensor hangs off, with its addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusConfig {
    I2c { address: u16 },
    Spi { cs: ChipSelect },
}

impl BusConfig {
    /// Short label used in the per-tick output header.
    pub fn label(&self) -> &'static str {
        match self {
            BusConfig::I2c { .. } => "I2C",
            BusConfig::Spi { .. } => "SPI",
        }
    }
}

/// Open the BME280 on the configured bus.
///
/// Any failure here (bus unavailable, wrong chip ID) is fatal to the
/// caller; once the sensor is open, per-read failures are not.
#[cfg(feature = "hardware")]
pub fn open_sensor(bus: &BusConfig) -> Result<Box<dyn EnvSensor>> {
    use bme280::linux::{I2cBus, SpiBus};

    let sensor: Box<dyn EnvSensor> = match bus {
        BusConfig::I2c { address } => Box::new(Bme280::new(I2cBus::open(*address)?)?),
        BusConfig::Spi { cs } => Box::new(Bme280::new(SpiBus::open(*cs)?)?),
    };
    Ok(sensor)
}

/// Hardware support was not compiled in; opening always fails.
#[cfg(not(feature = "hardware"))]
pub fn open_sensor(_bus: &BusConfig) -> Result<Box<dyn EnvSensor>> {
    Err(crate::error::UtilError::config(
        "sensor support not compiled in; rebuild with the `hardware` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_labels() {
        assert_eq!(BusConfig::I2c { address: 0x77 }.label(), "I2C");
        assert_eq!(BusConfig::Spi { cs: ChipSelect::Ce0 }.label(), "SPI");
    }

    #[test]
    fn test_chip_select_names() {
        let names: Vec<String> = ChipSelect::value_variants()
            .iter()
            .map(|cs| cs.to_possible_value().unwrap().get_name().to_string())
            .collect();
        assert_eq!(names, ["CE0", "CE1", "CE2"]);
    }
}
