//! Port traits: the hexagonal boundary between detection logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (magnetometer, MQTT notifier, display, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the detection core never touches
//! hardware directly.

use crate::detection::{Baseline, CalibrationProgress, DoorState, Sample, Transition};
use crate::error::{CommsError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the service calls this once per tick while it needs
/// samples.  Failures are reported as-is; the service never substitutes
/// a made-up sample.
pub trait SensorPort {
    fn read_sample(&mut self) -> Result<Sample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → IoT hub)
// ───────────────────────────────────────────────────────────────

/// Delivers door state changes upstream.
///
/// Called exactly once per [`Transition`].  Implementations own any
/// retry policy; the service never re-sends a transition.
pub trait NotifierPort {
    fn notify(&mut self, transition: &Transition) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen)
// ───────────────────────────────────────────────────────────────

/// What the status screen should currently show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayStatus {
    /// No network link; monitoring has not started.
    Offline,
    /// Waiting for the field to settle.
    Calibrating(CalibrationProgress),
    /// Baseline fixed; monitoring begins.
    Calibrated(Baseline),
    /// Latest evaluated reading.
    Reading { baseline: f64, magnitude: f64 },
    /// Door state changed.
    Door(DoorState),
    /// Detection halted.
    Fault,
}

/// Purely observational: nothing flows back into the service.
pub trait DisplayPort {
    fn show(&mut self, status: &DisplayStatus);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / audit)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
