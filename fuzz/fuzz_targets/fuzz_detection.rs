//! Fuzz target: calibration + door detection pipeline
//!
//! Decodes the input as a stream of 12-byte magnetometer samples (three
//! little-endian i32 axes) and feeds them through the `AppService` with
//! mock ports, verifying:
//! - No panics for any axis values, including `i32::MIN`/`i32::MAX`
//! - A baseline only exists once the FSM reached Monitoring
//! - Every reported transition flips the previously reported state
//!
//! cargo fuzz run fuzz_detection

#![no_main]

use libfuzzer_sys::fuzz_target;

use doormonitor::app::events::AppEvent;
use doormonitor::app::ports::{DisplayPort, DisplayStatus, EventSink, NotifierPort, SensorPort};
use doormonitor::app::service::AppService;
use doormonitor::config::SystemConfig;
use doormonitor::detection::{DoorState, Sample, Transition};
use doormonitor::error::{CommsError, SensorError};
use doormonitor::fsm::StateId;

struct Replay<'a> {
    chunks: core::slice::ChunksExact<'a, u8>,
}

impl SensorPort for Replay<'_> {
    fn read_sample(&mut self) -> Result<Sample, SensorError> {
        let c = self.chunks.next().ok_or(SensorError::BusFailed)?;
        let axis = |i: usize| i32::from_le_bytes([c[i], c[i + 1], c[i + 2], c[i + 3]]);
        Ok(Sample::new(axis(0), axis(4), axis(8)))
    }
}

struct Null;

impl NotifierPort for Null {
    fn notify(&mut self, _t: &Transition) -> Result<(), CommsError> {
        Ok(())
    }
}

impl DisplayPort for Null {
    fn show(&mut self, _s: &DisplayStatus) {}
}

impl EventSink for Null {
    fn emit(&mut self, _e: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig {
        required_stable_samples: 2,
        ..SystemConfig::default()
    };
    let Ok(mut app) = AppService::new(config) else {
        return;
    };
    let mut sensor = Replay {
        chunks: data.chunks_exact(12),
    };
    let (mut n, mut d, mut s) = (Null, Null, Null);
    app.start(true, &mut s);

    let mut last = DoorState::Closed;
    for _ in 0..data.len() / 12 {
        if let Ok(Some(t)) = app.tick(&mut sensor, &mut n, &mut d, &mut s) {
            assert_eq!(t.from, last);
            assert_ne!(t.from, t.to);
            last = t.to;
        }
        assert_eq!(app.baseline().is_some(), app.state() == StateId::Monitoring);
    }
});
