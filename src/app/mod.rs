//! Application core: detection orchestration, zero I/O.
//!
//! The [`service::AppService`] drives the node lifecycle (offline,
//! calibrating, monitoring) and routes detection results outward.  All
//! interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
