//! Hardware adapter: bridges the magnetometer to [`SensorPort`].
//!
//! The only module that hands real sensor data to the service.  Generic
//! over the I2C bus, so host tests plug in a mock bus.

use embedded_hal::i2c::I2c;

use crate::app::ports::SensorPort;
use crate::detection::Sample;
use crate::error::SensorError;
use crate::sensors::Lis2mdl;

impl<I2C: I2c> SensorPort for Lis2mdl<I2C> {
    fn read_sample(&mut self) -> Result<Sample, SensorError> {
        self.read_axes()
    }
}
