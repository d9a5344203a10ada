//! Sensor drivers.
//!
//! The door node carries a single LIS2MDL magnetometer on the shared I2C
//! bus.  Drivers here know registers and scaling only; the
//! [`SensorPort`](crate::app::ports::SensorPort) bridge lives in
//! `adapters::hardware`.

pub mod magnetometer;

pub use magnetometer::Lis2mdl;
