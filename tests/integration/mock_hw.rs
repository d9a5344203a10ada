//! Mock adapters for integration tests.
//!
//! Every port call is recorded so tests can assert on the full history
//! without a magnetometer, an IoT hub or a screen.

use std::collections::VecDeque;

use doormonitor::app::events::AppEvent;
use doormonitor::app::ports::{DisplayPort, DisplayStatus, EventSink, NotifierPort, SensorPort};
use doormonitor::detection::{DoorState, Sample, Transition};
use doormonitor::error::{CommsError, SensorError};

/// Sample whose magnitude is exactly `magnitude` (3-4-5 triangle).
pub fn sample_with_magnitude(magnitude: i32) -> Sample {
    assert_eq!(magnitude % 5, 0, "magnitude must be a multiple of 5");
    Sample::new(magnitude / 5 * 3, magnitude / 5 * 4, 0)
}

// ── MockSensor ────────────────────────────────────────────────

/// Replays queued readings; an empty queue reads as a bus failure.
#[derive(Default)]
pub struct MockSensor {
    queue: VecDeque<Result<Sample, SensorError>>,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.queue.push_back(Ok(sample));
    }

    pub fn push_n(&mut self, sample: Sample, n: usize) {
        for _ in 0..n {
            self.push(sample);
        }
    }

    pub fn push_err(&mut self, e: SensorError) {
        self.queue.push_back(Err(e));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl SensorPort for MockSensor {
    fn read_sample(&mut self) -> Result<Sample, SensorError> {
        self.reads += 1;
        self.queue.pop_front().unwrap_or(Err(SensorError::BusFailed))
    }
}

// ── MockNotifier ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockNotifier {
    /// Every transition handed to the notifier, delivered or not.
    pub attempts: Vec<Transition>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<DoorState> {
        self.attempts.iter().map(|t| t.to).collect()
    }
}

impl NotifierPort for MockNotifier {
    fn notify(&mut self, transition: &Transition) -> Result<(), CommsError> {
        self.attempts.push(*transition);
        if self.fail {
            Err(CommsError::MqttPublishFailed)
        } else {
            Ok(())
        }
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub shown: Vec<DisplayStatus>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_door(&self) -> Option<DoorState> {
        self.shown.iter().rev().find_map(|s| match s {
            DisplayStatus::Door(state) => Some(*state),
            _ => None,
        })
    }
}

impl DisplayPort for MockDisplay {
    fn show(&mut self, status: &DisplayStatus) {
        self.shown.push(*status);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
