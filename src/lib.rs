//! DoorMonitor firmware library.
//!
//! Exposes the detection core, the lifecycle FSM and the port adapters
//! for integration testing.  All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod detection;
pub mod error;
pub mod fsm;
pub mod sensors;
