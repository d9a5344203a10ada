//! LIS2MDL 3-axis magnetometer driver.
//!
//! Generic over any [`embedded_hal::i2c::I2c`] bus, so the same driver
//! runs on the ESP-IDF I2C driver and on a mock bus in host tests.
//!
//! ## Register usage
//!
//! | Register    | Addr | Value  | Purpose                                 |
//! |-------------|------|--------|-----------------------------------------|
//! | WHO_AM_I    | 0x4F | 0x40   | device identification                   |
//! | CFG_REG_A   | 0x60 | 0x80   | temp compensation, 10 Hz, continuous    |
//! | CFG_REG_C   | 0x62 | 0x10   | block data update                       |
//! | OUTX_L_REG  | 0x68 | -      | 6-byte burst: X, Y, Z little-endian i16 |
//!
//! Raw counts are scaled by the fixed 1.5 mG/LSB sensitivity, so samples
//! are reported in milli-gauss.

use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::detection::Sample;
use crate::error::SensorError;

/// 7-bit I2C address (fixed by the part).
pub const LIS2MDL_ADDR: u8 = 0x1E;

pub const REG_WHO_AM_I: u8 = 0x4F;
pub const REG_CFG_A: u8 = 0x60;
pub const REG_CFG_C: u8 = 0x62;
pub const REG_OUTX_L: u8 = 0x68;

pub const WHO_AM_I_VALUE: u8 = 0x40;

/// COMP_TEMP_EN, ODR = 10 Hz, MD = continuous.
const CFG_A_CONTINUOUS: u8 = 0x80;
/// BDU: output registers update only after both bytes are read.
const CFG_C_BDU: u8 = 0x10;

/// Scale a raw count to milli-gauss (1.5 mG/LSB).
pub fn counts_to_milligauss(raw: i16) -> i32 {
    i32::from(raw) * 3 / 2
}

pub struct Lis2mdl<I2C> {
    i2c: I2C,
    initialized: bool,
}

impl<I2C: I2c> Lis2mdl<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            initialized: false,
        }
    }

    /// Verify the device id and put it into continuous conversion.
    pub fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_register(REG_WHO_AM_I)?;
        if id != WHO_AM_I_VALUE {
            return Err(SensorError::NotDetected);
        }
        self.write_register(REG_CFG_A, CFG_A_CONTINUOUS)?;
        self.write_register(REG_CFG_C, CFG_C_BDU)?;
        self.initialized = true;
        info!("LIS2MDL: initialised (continuous, 10 Hz)");
        Ok(())
    }

    /// Read all three axes in milli-gauss.
    pub fn read_axes(&mut self) -> Result<Sample, SensorError> {
        if !self.initialized {
            return Err(SensorError::NotInitialized);
        }
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(LIS2MDL_ADDR, &[REG_OUTX_L], &mut buf)
            .map_err(|_| SensorError::BusFailed)?;

        let x = counts_to_milligauss(i16::from_le_bytes([buf[0], buf[1]]));
        let y = counts_to_milligauss(i16::from_le_bytes([buf[2], buf[3]]));
        let z = counts_to_milligauss(i16::from_le_bytes([buf[4], buf[5]]));
        debug!("Axes: x - {}, y - {}, z - {}", x, y, z);
        Ok(Sample::new(x, y, z))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Give the bus back (e.g. to share it after shutdown).
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(LIS2MDL_ADDR, &[reg], &mut buf)
            .map_err(|_| SensorError::BusFailed)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(LIS2MDL_ADDR, &[reg, value])
            .map_err(|_| SensorError::BusFailed)
    }
}
