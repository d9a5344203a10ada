//! Lifecycle tests: link gating, calibration timeout, startup events.

use super::mock_hw::{MockDisplay, MockNotifier, MockSensor, RecordingSink, sample_with_magnitude};

use doormonitor::app::events::AppEvent;
use doormonitor::app::ports::DisplayStatus;
use doormonitor::app::service::AppService;
use doormonitor::config::SystemConfig;
use doormonitor::detection::Sample;
use doormonitor::fsm::StateId;

#[test]
fn offline_node_does_not_read_the_sensor() {
    let mut app = AppService::new(SystemConfig::default()).unwrap();
    let mut sensor = MockSensor::new();
    let mut notifier = MockNotifier::new();
    let mut display = MockDisplay::new();
    let mut sink = RecordingSink::new();

    app.start(false, &mut sink);
    assert_eq!(sink.events, vec![AppEvent::Started(StateId::Offline)]);

    for _ in 0..3 {
        app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
            .unwrap();
    }
    assert_eq!(sensor.reads, 0);
    assert_eq!(app.state(), StateId::Offline);
    assert_eq!(app.tick_count(), 3);
}

#[test]
fn link_up_starts_calibration() {
    let mut app = AppService::new(SystemConfig::default()).unwrap();
    let mut sensor = MockSensor::new();
    let mut notifier = MockNotifier::new();
    let mut display = MockDisplay::new();
    let mut sink = RecordingSink::new();

    app.start(false, &mut sink);
    app.set_link(true);
    app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
        .unwrap();
    assert_eq!(app.state(), StateId::Calibrating);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Offline,
        to: StateId::Calibrating,
    }));

    sensor.push_n(sample_with_magnitude(1000), 6);
    while sensor.pending() > 0 {
        app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
            .unwrap();
    }
    assert_eq!(app.state(), StateId::Monitoring);
}

#[test]
fn start_with_link_reports_calibrating() {
    let mut app = AppService::new(SystemConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    app.start(true, &mut sink);
    assert_eq!(sink.events, vec![AppEvent::Started(StateId::Calibrating)]);
}

#[test]
fn monitoring_survives_link_loss() {
    let mut app = AppService::new(SystemConfig::default()).unwrap();
    let mut sensor = MockSensor::new();
    let mut notifier = MockNotifier::new();
    let mut display = MockDisplay::new();
    let mut sink = RecordingSink::new();
    app.start(true, &mut sink);
    sensor.push_n(sample_with_magnitude(1000), 6);
    while sensor.pending() > 0 {
        app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
            .unwrap();
    }

    app.set_link(false);
    sensor.push(sample_with_magnitude(500));
    let t = app
        .tick(&mut sensor, &mut notifier, &mut display, &mut sink)
        .unwrap();
    assert!(t.is_some());
    assert_eq!(app.state(), StateId::Monitoring);
}

#[test]
fn unstable_field_restarts_calibration_after_timeout() {
    let config = SystemConfig {
        calibration_timeout_secs: 10,
        ..SystemConfig::default()
    };
    let mut app = AppService::new(config).unwrap();
    let mut sensor = MockSensor::new();
    let mut notifier = MockNotifier::new();
    let mut display = MockDisplay::new();
    let mut sink = RecordingSink::new();
    app.start(true, &mut sink);

    // Alternate between two fields far apart so nothing ever settles.
    for i in 0..10 {
        let x = if i % 2 == 0 { 0 } else { 500 };
        sensor.push(Sample::new(x, 0, 0));
    }
    while sensor.pending() > 0 {
        app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
            .unwrap();
    }

    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::CalibrationRestarted)),
        1
    );
    assert_eq!(app.state(), StateId::Calibrating);
    assert!(app.baseline().is_none());
    assert_eq!(app.calibration_progress().unwrap().stable, 0);

    // A steady field after the restart still calibrates.
    sensor.push_n(sample_with_magnitude(1000), 6);
    while sensor.pending() > 0 {
        app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
            .unwrap();
    }
    assert_eq!(app.state(), StateId::Monitoring);
}

#[test]
fn calibration_without_timeout_waits_forever() {
    let mut app = AppService::new(SystemConfig::default()).unwrap();
    let mut sensor = MockSensor::new();
    let mut notifier = MockNotifier::new();
    let mut display = MockDisplay::new();
    let mut sink = RecordingSink::new();
    app.start(true, &mut sink);

    for i in 0..200 {
        sensor.push(Sample::new(i * 100, 0, 0));
        app.tick(&mut sensor, &mut notifier, &mut display, &mut sink)
            .unwrap();
    }
    assert_eq!(app.state(), StateId::Calibrating);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::CalibrationRestarted)), 0);
    assert!(display
        .shown
        .iter()
        .all(|s| matches!(s, DisplayStatus::Calibrating(_))));
}
