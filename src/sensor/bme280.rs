//! Bosch BME280 driver, generic over the register-level bus.
//!
//! Compensation follows the integer routines from the BME280 datasheet
//! (section 8.2): 32-bit temperature, 64-bit pressure, 32-bit humidity,
//! all keyed off the shared `t_fine` carry.

use crate::error::{Result, UtilError};
use crate::readings::EnvReading;
use crate::sensor::EnvSensor;

const REG_ID: u8 = 0xD0;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_DATA: u8 = 0xF7;
const REG_CALIB_TP: u8 = 0x88;
const REG_CALIB_H: u8 = 0xE1;

const CHIP_ID: u8 = 0x60;

// Humidity oversampling x1; temperature and pressure oversampling x1 in
// normal mode; 1000 ms standby between conversions.
const CTRL_HUM_OS_X1: u8 = 0x01;
const CTRL_MEAS_NORMAL: u8 = 0x27;
const CONFIG_STANDBY_1000MS: u8 = 0xA0;

/// Register-level access to the chip, implemented per bus type.
pub trait Bme280Bus {
    /// Burst-read `buf.len()` bytes starting at `reg`.
    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<()>;

    /// Write one register.
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<()>;
}

/// Factory-programmed compensation parameters.
#[derive(Debug, Clone, Copy, Default)]
struct Calibration {
    t1: u16,
    t2: i16,
    t3: i16,
    p1: u16,
    p2: i16,
    p3: i16,
    p4: i16,
    p5: i16,
    p6: i16,
    p7: i16,
    p8: i16,
    p9: i16,
    h1: u8,
    h2: i16,
    h3: u8,
    h4: i16,
    h5: i16,
    h6: i8,
}

/// A BME280 on some bus, configured for continuous sampling.
#[derive(Debug)]
pub struct Bme280<B: Bme280Bus> {
    bus: B,
    calib: Calibration,
}

impl<B: Bme280Bus> Bme280<B> {
    /// Probe the chip, load its calibration and switch it to normal mode.
    pub fn new(mut bus: B) -> Result<Self> {
        let mut id = [0u8];
        bus.read_regs(REG_ID, &mut id)?;
        if id[0] != CHIP_ID {
            return Err(UtilError::sensor(format!(
                "unexpected chip ID 0x{:02X} (expected 0x{CHIP_ID:02X})",
                id[0]
            )));
        }

        let calib = read_calibration(&mut bus)?;

        bus.write_reg(REG_CTRL_HUM, CTRL_HUM_OS_X1)?;
        bus.write_reg(REG_CONFIG, CONFIG_STANDBY_1000MS)?;
        bus.write_reg(REG_CTRL_MEAS, CTRL_MEAS_NORMAL)?;

        Ok(Self { bus, calib })
    }

    /// Read and compensate one measurement.
    pub fn read(&mut self) -> Result<EnvReading> {
        let mut data = [0u8; 8];
        self.bus.read_regs(REG_DATA, &mut data)?;

        let adc_p = ((data[0] as u32) << 12) | ((data[1] as u32) << 4) | ((data[2] as u32) >> 4);
        let adc_t = ((data[3] as u32) << 12) | ((data[4] as u32) << 4) | ((data[5] as u32) >> 4);
        let adc_h = ((data[6] as u32) << 8) | (data[7] as u32);

        let (temperature, t_fine) = compensate_temperature(&self.calib, adc_t as i32);
        let pressure = compensate_pressure(&self.calib, adc_p as i32, t_fine);
        let humidity = compensate_humidity(&self.calib, adc_h as i32, t_fine);

        Ok(EnvReading::new(temperature, humidity, pressure))
    }
}

impl<B: Bme280Bus> EnvSensor for Bme280<B> {
    fn sample(&mut self) -> Result<EnvReading> {
        self.read()
    }
}

fn read_calibration<B: Bme280Bus>(bus: &mut B) -> Result<Calibration> {
    // 0x88..=0xA1: dig_T1..dig_P9 packed little-endian, then dig_H1 at 0xA1.
    let mut tp = [0u8; 26];
    bus.read_regs(REG_CALIB_TP, &mut tp)?;
    // 0xE1..=0xE7: dig_H2..dig_H6, with H4/H5 sharing a nibble register.
    let mut h = [0u8; 7];
    bus.read_regs(REG_CALIB_H, &mut h)?;

    let u16le = |b: &[u8], i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
    let i16le = |b: &[u8], i: usize| i16::from_le_bytes([b[i], b[i + 1]]);

    Ok(Calibration {
        t1: u16le(&tp, 0),
        t2: i16le(&tp, 2),
        t3: i16le(&tp, 4),
        p1: u16le(&tp, 6),
        p2: i16le(&tp, 8),
        p3: i16le(&tp, 10),
        p4: i16le(&tp, 12),
        p5: i16le(&tp, 14),
        p6: i16le(&tp, 16),
        p7: i16le(&tp, 18),
        p8: i16le(&tp, 20),
        p9: i16le(&tp, 22),
        h1: tp[25],
        h2: i16le(&h, 0),
        h3: h[2],
        h4: ((h[3] as i16) << 4) | ((h[4] & 0x0F) as i16),
        h5: ((h[5] as i16) << 4) | ((h[4] >> 4) as i16),
        h6: h[6] as i8,
    })
}

/// Returns degrees Celsius and the `t_fine` carry used by the other two.
fn compensate_temperature(calib: &Calibration, adc_t: i32) -> (f64, i32) {
    let var1 = (((adc_t >> 3) - ((calib.t1 as i32) << 1)) * (calib.t2 as i32)) >> 11;
    let var2 = (((((adc_t >> 4) - (calib.t1 as i32)) * ((adc_t >> 4) - (calib.t1 as i32))) >> 12)
        * (calib.t3 as i32))
        >> 14;
    let t_fine = var1 + var2;
    let centi_degrees = (t_fine * 5 + 128) >> 8;
    (centi_degrees as f64 / 100.0, t_fine)
}

/// Returns hPa; 0.0 when the calibration would divide by zero.
fn compensate_pressure(calib: &Calibration, adc_p: i32, t_fine: i32) -> f64 {
    let mut var1 = (t_fine as i64) - 128000;
    let mut var2 = var1 * var1 * (calib.p6 as i64);
    var2 += (var1 * (calib.p5 as i64)) << 17;
    var2 += (calib.p4 as i64) << 35;
    var1 = ((var1 * var1 * (calib.p3 as i64)) >> 8) + ((var1 * (calib.p2 as i64)) << 12);
    var1 = (((1i64 << 47) + var1) * (calib.p1 as i64)) >> 33;

    if var1 == 0 {
        return 0.0;
    }

    let mut p = 1_048_576i64 - (adc_p as i64);
    p = (((p << 31) - var2) * 3125) / var1;
    var1 = ((calib.p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
    var2 = ((calib.p8 as i64) * p) >> 19;
    p = ((p + var1 + var2) >> 8) + ((calib.p7 as i64) << 4);

    // p is Pa in Q24.8 fixed point.
    (p as f64) / 256.0 / 100.0
}

/// Returns relative humidity in percent, clamped to 0..=100.
fn compensate_humidity(calib: &Calibration, adc_h: i32, t_fine: i32) -> f64 {
    let mut v = t_fine - 76800;
    let coarse =
        (((adc_h << 14) - ((calib.h4 as i32) << 20) - ((calib.h5 as i32) * v)) + 16384) >> 15;
    let scale = (((v * (calib.h6 as i32)) >> 10) * (((v * (calib.h3 as i32)) >> 11) + 32768)) >> 10;
    let scale = ((scale + 2_097_152) * (calib.h2 as i32) + 8192) >> 14;
    v = coarse * scale;
    v -= ((((v >> 15) * (v >> 15)) >> 7) * (calib.h1 as i32)) >> 4;
    let v = v.clamp(0, 419_430_400);
    (v >> 12) as f64 / 1024.0
}

/// rppal-backed buses, Raspberry Pi only.
#[cfg(feature = "hardware")]
pub mod linux {
    use super::Bme280Bus;
    use crate::error::{Result, UtilError};
    use crate::sensor::ChipSelect;
    use rppal::i2c::I2c;
    use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

    const SPI_CLOCK_HZ: u32 = 1_000_000;

    /// BME280 on the I2C bus at a fixed slave address.
    pub struct I2cBus {
        i2c: I2c,
    }

    impl I2cBus {
        pub fn open(address: u16) -> Result<Self> {
            let mut i2c = I2c::new()
                .map_err(|e| UtilError::sensor(format!("failed to open the I2C bus: {e}")))?;
            i2c.set_slave_address(address)
                .map_err(|e| UtilError::sensor(format!("invalid I2C slave address: {e}")))?;
            Ok(Self { i2c })
        }
    }

    impl Bme280Bus for I2cBus {
        fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
            self.i2c
                .write_read(&[reg], buf)
                .map_err(|e| UtilError::read(format!("Error reading sensor data: {e}")))
        }

        fn write_reg(&mut self, reg: u8, value: u8) -> Result<()> {
            self.i2c
                .write(&[reg, value])
                .map(|_| ())
                .map_err(|e| UtilError::sensor(format!("register write failed: {e}")))
        }
    }

    /// BME280 on SPI0 behind one of the chip-select lines.
    pub struct SpiBus {
        spi: Spi,
    }

    impl SpiBus {
        pub fn open(cs: ChipSelect) -> Result<Self> {
            let slave = match cs {
                ChipSelect::Ce0 => SlaveSelect::Ss0,
                ChipSelect::Ce1 => SlaveSelect::Ss1,
                ChipSelect::Ce2 => SlaveSelect::Ss2,
            };
            let spi = Spi::new(Bus::Spi0, slave, SPI_CLOCK_HZ, Mode::Mode0)
                .map_err(|e| UtilError::sensor(format!("failed to open the SPI bus: {e}")))?;
            Ok(Self { spi })
        }
    }

    impl Bme280Bus for SpiBus {
        fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
            // Read control byte has bit 7 set; the first returned byte is
            // clocked out during the control byte and discarded.
            let mut write = vec![0u8; buf.len() + 1];
            write[0] = reg | 0x80;
            let mut read = vec![0u8; buf.len() + 1];
            self.spi
                .transfer(&mut read, &write)
                .map_err(|e| UtilError::read(format!("Error reading sensor data: {e}")))?;
            buf.copy_from_slice(&read[1..]);
            Ok(())
        }

        fn write_reg(&mut self, reg: u8, value: u8) -> Result<()> {
            self.spi
                .write(&[reg & 0x7F, value])
                .map(|_| ())
                .map_err(|e| UtilError::sensor(format!("register write failed: {e}")))
        }
    }
}
