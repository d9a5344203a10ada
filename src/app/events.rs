//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them, such as logging to serial.

use crate::detection::{CalibrationProgress, Transition};
use crate::error::{CommsError, Error, SensorError};
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The lifecycle FSM moved between states.
    StateChanged { from: StateId, to: StateId },

    /// One more calibration sample was taken.
    CalibrationProgress(CalibrationProgress),

    /// Calibration finished with this baseline magnitude.
    Calibrated { baseline: f64 },

    /// Calibration did not converge in time and started over.
    CalibrationRestarted,

    /// The door opened or closed.
    DoorChanged(Transition),

    /// First notification delivered.  Emitted at most once per boot.
    MonitorStarted { version: &'static str },

    /// A door notification could not be delivered.
    NotifyFailed(CommsError),

    /// The magnetometer could not be read this tick.
    SensorFailed(SensorError),

    /// Detection halted on a precondition violation.
    Fault(Error),
}
