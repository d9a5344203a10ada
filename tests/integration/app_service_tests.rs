//! Integration tests for the sensor → AppService → notifier pipeline.

use super::mock_hw::{MockDisplay, MockNotifier, MockSensor, RecordingSink, sample_with_magnitude};

use doormonitor::app::events::AppEvent;
use doormonitor::app::ports::DisplayStatus;
use doormonitor::app::service::AppService;
use doormonitor::config::{APP_VERSION, SystemConfig};
use doormonitor::detection::{DoorState, Transition};
use doormonitor::error::{CommsError, Error, SensorError};
use doormonitor::fsm::StateId;

struct Rig {
    app: AppService,
    sensor: MockSensor,
    notifier: MockNotifier,
    display: MockDisplay,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: SystemConfig) -> Self {
        let mut app = AppService::new(config).unwrap();
        let mut sink = RecordingSink::new();
        app.start(true, &mut sink);
        Self {
            app,
            sensor: MockSensor::new(),
            notifier: MockNotifier::new(),
            display: MockDisplay::new(),
            sink,
        }
    }

    fn tick(&mut self) -> Result<Option<Transition>, Error> {
        self.app.tick(
            &mut self.sensor,
            &mut self.notifier,
            &mut self.display,
            &mut self.sink,
        )
    }

    /// Drain every queued sample, collecting the transitions reported.
    fn run(&mut self) -> Vec<Transition> {
        let mut out = Vec::new();
        while self.sensor.pending() > 0 {
            if let Ok(Some(t)) = self.tick() {
                out.push(t);
            }
        }
        out
    }

    /// Calibrate on a steady field of magnitude 1000.
    fn calibrated() -> Self {
        let mut rig = Self::new(SystemConfig::default());
        // One seed sample plus five stable ones.
        rig.sensor.push_n(sample_with_magnitude(1000), 6);
        rig.run();
        assert_eq!(rig.app.state(), StateId::Monitoring);
        rig
    }
}

// ── Calibration ───────────────────────────────────────────────

#[test]
fn steady_field_calibrates_after_seed_plus_required_samples() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.sensor.push_n(sample_with_magnitude(1000), 5);
    rig.run();
    assert_eq!(rig.app.state(), StateId::Calibrating);
    assert_eq!(rig.app.calibration_progress().unwrap().remaining(), 1);

    rig.sensor.push(sample_with_magnitude(1000));
    rig.run();
    assert_eq!(rig.app.state(), StateId::Monitoring);
    let baseline = rig.app.baseline().unwrap().value();
    assert!((baseline - 1000.0).abs() < 1e-9);
    assert_eq!(rig.app.door_state(), Some(DoorState::Closed));
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Calibrated { .. })),
        1
    );
    assert!(rig
        .display
        .shown
        .iter()
        .any(|s| matches!(s, DisplayStatus::Calibrated(_))));
}

#[test]
fn drifting_field_restarts_the_stable_count() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.sensor.push_n(sample_with_magnitude(1000), 4);
    // 50 units away on x: outside the per-axis threshold of 10.
    rig.sensor.push(sample_with_magnitude(1050));
    rig.run();
    let progress = rig.app.calibration_progress().unwrap();
    assert_eq!(progress.stable, 0);
    assert_eq!(progress.remaining(), 5);
}

#[test]
fn sensor_failure_during_calibration_keeps_progress() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.sensor.push_n(sample_with_magnitude(1000), 3);
    rig.run();
    let before = rig.app.calibration_progress().unwrap();

    rig.sensor.push_err(SensorError::BusFailed);
    assert_eq!(rig.tick(), Err(Error::Sensor(SensorError::BusFailed)));
    assert_eq!(rig.app.calibration_progress().unwrap(), before);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SensorFailed(SensorError::BusFailed))),
        1
    );
}

// ── Monitoring ────────────────────────────────────────────────

#[test]
fn magnet_moving_away_opens_then_returning_closes() {
    let mut rig = Rig::calibrated();
    // Threshold is 1000 - 250 = 750.
    rig.sensor.push(sample_with_magnitude(740));
    rig.sensor.push(sample_with_magnitude(760));
    let transitions = rig.run();

    assert_eq!(
        transitions,
        vec![
            Transition { from: DoorState::Closed, to: DoorState::Open },
            Transition { from: DoorState::Open, to: DoorState::Closed },
        ]
    );
    assert_eq!(rig.notifier.states(), vec![DoorState::Open, DoorState::Closed]);
    assert_eq!(rig.display.last_door(), Some(DoorState::Closed));
}

#[test]
fn steady_open_door_notifies_once() {
    let mut rig = Rig::calibrated();
    rig.sensor.push_n(sample_with_magnitude(500), 10);
    let transitions = rig.run();
    assert_eq!(transitions.len(), 1);
    assert_eq!(rig.notifier.attempts.len(), 1);
    assert_eq!(rig.app.door_state(), Some(DoorState::Open));
}

#[test]
fn readings_are_shown_every_monitoring_tick() {
    let mut rig = Rig::calibrated();
    rig.sensor.push_n(sample_with_magnitude(1000), 3);
    rig.run();
    let readings = rig
        .display
        .shown
        .iter()
        .filter(|s| matches!(s, DisplayStatus::Reading { .. }))
        .count();
    assert_eq!(readings, 3);
}

#[test]
fn first_delivery_emits_monitor_started_once() {
    let mut rig = Rig::calibrated();
    assert!(!rig.app.monitor_started());
    rig.sensor.push(sample_with_magnitude(500));
    rig.sensor.push(sample_with_magnitude(1000));
    rig.sensor.push(sample_with_magnitude(500));
    rig.run();

    assert!(rig.app.monitor_started());
    let started: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::MonitorStarted { .. }))
        .collect();
    assert_eq!(started, vec![&AppEvent::MonitorStarted { version: APP_VERSION }]);
}

#[test]
fn failed_delivery_is_reported_and_not_retried() {
    let mut rig = Rig::calibrated();
    rig.notifier.fail = true;
    rig.sensor.push_n(sample_with_magnitude(500), 3);
    rig.run();

    assert_eq!(rig.notifier.attempts.len(), 1);
    assert!(!rig.app.monitor_started());
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::NotifyFailed(CommsError::MqttPublishFailed)),
        1
    );
    // The detector still tracks the door.
    assert_eq!(rig.app.door_state(), Some(DoorState::Open));

    rig.notifier.fail = false;
    rig.sensor.push(sample_with_magnitude(1000));
    rig.run();
    assert!(rig.app.monitor_started());
    assert_eq!(rig.notifier.states(), vec![DoorState::Open, DoorState::Closed]);
}

#[test]
fn sensor_failure_while_monitoring_keeps_door_state() {
    let mut rig = Rig::calibrated();
    rig.sensor.push(sample_with_magnitude(500));
    rig.run();
    assert!(rig.tick().is_err());
    assert_eq!(rig.app.door_state(), Some(DoorState::Open));
    assert_eq!(rig.app.state(), StateId::Monitoring);
}

// ── Direct evaluation ─────────────────────────────────────────

#[test]
fn evaluate_uses_the_calibrated_detector() {
    let mut rig = Rig::calibrated();
    let (state, t) = rig.app.evaluate(&sample_with_magnitude(740)).unwrap();
    assert_eq!(state, DoorState::Open);
    assert!(t.is_some());
    // Direct evaluation never reaches the notifier.
    assert!(rig.notifier.attempts.is_empty());
}
