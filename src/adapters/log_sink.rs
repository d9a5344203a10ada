//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::CalibrationProgress(p) => {
                info!(
                    "CALIB | stable={}/{} remaining={}",
                    p.stable,
                    p.required,
                    p.remaining()
                );
            }
            AppEvent::Calibrated { baseline } => {
                info!("CALIB | done baseline={:.1}", baseline);
            }
            AppEvent::CalibrationRestarted => {
                warn!("CALIB | timed out, restarting");
            }
            AppEvent::DoorChanged(t) => {
                info!("DOOR  | {} -> {}", t.from, t.to);
            }
            AppEvent::MonitorStarted { version } => {
                info!("AUDIT | monitor started {}", version);
            }
            AppEvent::NotifyFailed(e) => {
                warn!("NOTIFY| failed: {}", e);
            }
            AppEvent::SensorFailed(e) => {
                warn!("SENSOR| read failed: {}", e);
            }
            AppEvent::Fault(e) => {
                error!("FAULT | {}", e);
            }
        }
    }
}
