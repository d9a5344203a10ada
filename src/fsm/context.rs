//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It owns the calibrator and (once calibrated) the detector,
//! carries the sample for the current tick in, and carries the tick's
//! results out to the [`AppService`](crate::app::service::AppService).

use crate::config::SystemConfig;
use crate::detection::{Baseline, CalibrationProgress, Calibrator, DoorStateDetector, Sample, Transition};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Tick outputs (written by state handlers; drained by the service)
// ---------------------------------------------------------------------------

/// Everything a state handler produced during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutputs {
    /// Calibration is still running.
    pub progress: Option<CalibrationProgress>,
    /// Calibration finished on this tick.
    pub calibrated: Option<Baseline>,
    /// Calibration timed out and was restarted.
    pub calibration_restarted: bool,
    /// Field magnitude evaluated while monitoring.
    pub magnitude: Option<f64>,
    /// Door state changed on this tick.
    pub transition: Option<Transition>,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Duration of one tick in seconds.
    pub tick_period_secs: f32,

    // -- Inputs --
    /// Network link (WiFi + IoT hub) is up.
    pub link_up: bool,
    /// Sample for the current tick, if the driver read one.
    pub sample: Option<Sample>,

    // -- Detection --
    pub calibrator: Calibrator,
    /// Present iff calibration has completed.
    pub detector: Option<DoorStateDetector>,

    // -- Outputs --
    pub outputs: TickOutputs,
    /// Set when a handler hits a precondition violation.
    pub fault: Option<Error>,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            tick_period_secs: config.poll_period_secs(),
            link_up: false,
            sample: None,
            calibrator: Calibrator::new(config.stability_threshold, config.required_stable_samples),
            detector: None,
            outputs: TickOutputs::default(),
            fault: None,
            config,
        }
    }

    /// Seconds elapsed since the current state was entered.
    pub fn secs_in_state(&self) -> f32 {
        self.ticks_in_state as f32 * self.tick_period_secs
    }

    /// Take and clear this tick's outputs.
    pub fn take_outputs(&mut self) -> TickOutputs {
        core::mem::take(&mut self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_uncalibrated() {
        let ctx = FsmContext::new(SystemConfig::default());
        assert!(ctx.detector.is_none());
        assert!(!ctx.calibrator.is_done());
        assert!(!ctx.link_up);
        assert!((ctx.tick_period_secs - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn take_outputs_clears() {
        let mut ctx = FsmContext::new(SystemConfig::default());
        ctx.outputs.calibration_restarted = true;
        ctx.outputs.magnitude = Some(12.0);
        let out = ctx.take_outputs();
        assert!(out.calibration_restarted);
        assert_eq!(ctx.outputs, TickOutputs::default());
    }

    #[test]
    fn secs_in_state_scales_with_period() {
        let config = SystemConfig { poll_interval_ms: 500, ..SystemConfig::default() };
        let mut ctx = FsmContext::new(config);
        ctx.ticks_in_state = 6;
        assert!((ctx.secs_in_state() - 3.0).abs() < 1e-6);
    }
}
