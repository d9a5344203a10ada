//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the lifecycle FSM and its context (calibrator,
//! detector) plus the driver-side bookkeeping the detection core does not
//! own, such as the one-shot "monitor started" audit flag.  All I/O flows
//! through port traits injected at call sites.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ NotifierPort
//!                 │        AppService        │ ──▶ DisplayPort
//!                 │ FSM · Calibrator · Door  │ ──▶ EventSink
//!                 └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{APP_VERSION, SystemConfig};
use crate::detection::{Baseline, CalibrationProgress, DoorState, Sample, Transition};
use crate::error::{DetectorError, Error, Result};
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::AppEvent;
use super::ports::{DisplayPort, DisplayStatus, EventSink, NotifierPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    tick_count: u64,
    /// Set after the first successful notification.
    monitor_started: bool,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: Fsm::new(build_state_table(), StateId::Offline),
            ctx: FsmContext::new(config),
            tick_count: 0,
            monitor_started: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM.  With the link already up, calibration begins
    /// immediately; otherwise the node waits in `Offline`.
    pub fn start(&mut self, link_up: bool, sink: &mut impl EventSink) {
        self.ctx.link_up = link_up;
        self.fsm.start(&mut self.ctx);
        if link_up {
            self.fsm.force_transition(StateId::Calibrating, &mut self.ctx);
        }
        let state = self.fsm.current_state();
        sink.emit(&AppEvent::Started(state));
        info!("AppService started in {:?}", state);
    }

    /// Report the current network link status.
    pub fn set_link(&mut self, up: bool) {
        if self.ctx.link_up != up {
            info!("Link {}", if up { "up" } else { "down" });
        }
        self.ctx.link_up = up;
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one poll: read a sample (when calibrating or monitoring),
    /// advance the FSM, then fan the results out to the display, the
    /// notifier and the event sink.
    ///
    /// A failed sensor read is returned as `Error::Sensor` and leaves the
    /// calibrator and detector untouched.
    pub fn tick(
        &mut self,
        sensor: &mut impl SensorPort,
        notifier: &mut impl NotifierPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<Transition>> {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        // 1. Sample, only while detection needs one
        if prev_state.needs_sample() {
            match sensor.read_sample() {
                Ok(sample) => self.ctx.sample = Some(sample),
                Err(e) => {
                    warn!("Magnetometer read failed: {}", e);
                    sink.emit(&AppEvent::SensorFailed(e));
                    return Err(e.into());
                }
            }
        }

        // 2. FSM tick (pure detection logic)
        self.fsm.tick(&mut self.ctx);
        self.ctx.sample = None;
        let out = self.ctx.take_outputs();

        // 3. Calibration results
        if out.calibration_restarted {
            sink.emit(&AppEvent::CalibrationRestarted);
        }
        if let Some(progress) = out.progress {
            display.show(&DisplayStatus::Calibrating(progress));
            sink.emit(&AppEvent::CalibrationProgress(progress));
        }
        if let Some(baseline) = out.calibrated {
            display.show(&DisplayStatus::Calibrated(baseline));
            sink.emit(&AppEvent::Calibrated {
                baseline: baseline.value(),
            });
        }

        // 4. Door results
        if let (Some(magnitude), Some(baseline)) = (out.magnitude, self.baseline()) {
            display.show(&DisplayStatus::Reading {
                baseline: baseline.value(),
                magnitude,
            });
        }
        if let Some(transition) = out.transition {
            display.show(&DisplayStatus::Door(transition.to));
            sink.emit(&AppEvent::DoorChanged(transition));
            self.dispatch(&transition, notifier, sink);
        }

        // 5. Lifecycle changes
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
            match new_state {
                StateId::Offline => display.show(&DisplayStatus::Offline),
                StateId::Fault => {
                    display.show(&DisplayStatus::Fault);
                    if let Some(e) = self.ctx.fault {
                        sink.emit(&AppEvent::Fault(e));
                    }
                }
                StateId::Calibrating | StateId::Monitoring => {}
            }
        }

        Ok(out.transition)
    }

    /// Evaluate one sample against the calibrated detector directly.
    ///
    /// Nothing is notified or displayed; callers that drive detection
    /// themselves own delivery.  Fails with `NotCalibrated` before a
    /// baseline exists.
    pub fn evaluate(&mut self, sample: &Sample) -> Result<(DoorState, Option<Transition>)> {
        let detector = self
            .ctx
            .detector
            .as_mut()
            .ok_or(DetectorError::NotCalibrated)?;
        Ok(detector.evaluate(sample))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Current door state; `None` until calibrated.
    pub fn door_state(&self) -> Option<DoorState> {
        self.ctx.detector.as_ref().map(|d| d.state())
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.ctx.detector.as_ref().map(|d| d.baseline())
    }

    /// Progress while calibrating; `None` in every other state.
    pub fn calibration_progress(&self) -> Option<CalibrationProgress> {
        (self.fsm.current_state() == StateId::Calibrating).then(|| self.ctx.calibrator.progress())
    }

    /// Whether a notification has ever been delivered since boot.
    pub fn monitor_started(&self) -> bool {
        self.monitor_started
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn fault(&self) -> Option<Error> {
        self.ctx.fault
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Hand one transition to the notifier.  Never retried here.
    fn dispatch(
        &mut self,
        transition: &Transition,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) {
        match notifier.notify(transition) {
            Ok(()) => {
                if !self.monitor_started {
                    self.monitor_started = true;
                    info!("First door notification delivered ({})", APP_VERSION);
                    sink.emit(&AppEvent::MonitorStarted {
                        version: APP_VERSION,
                    });
                }
            }
            Err(e) => {
                warn!("Door notification failed: {}", e);
                sink.emit(&AppEvent::NotifyFailed(e));
            }
        }
    }
}
