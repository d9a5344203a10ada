//! Concrete state handler functions and table builder.
//!
//! Each state is a row of plain `fn` pointers over the shared
//! [`FsmContext`].
//!
//! ```text
//!  OFFLINE ──[link up]──▶ CALIBRATING ──[baseline fixed]──▶ MONITORING
//!                           │     ▲                              │
//!                           └─────┘                    [no detector]
//!                          [timeout]                             ▼
//!                                                              FAULT
//! ```

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use crate::detection::{CalibrationResult, DoorStateDetector};
use crate::error::DetectorError;
use log::{error, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Offline
        StateDescriptor {
            id: StateId::Offline,
            name: "Offline",
            on_enter: Some(offline_enter),
            on_exit: None,
            on_update: offline_update,
        },
        // Index 1: Calibrating
        StateDescriptor {
            id: StateId::Calibrating,
            name: "Calibrating",
            on_enter: Some(calibrating_enter),
            on_exit: None,
            on_update: calibrating_update,
        },
        // Index 2: Monitoring
        StateDescriptor {
            id: StateId::Monitoring,
            name: "Monitoring",
            on_enter: Some(monitoring_enter),
            on_exit: None,
            on_update: monitoring_update,
        },
        // Index 3: Fault
        StateDescriptor {
            id: StateId::Fault,
            name: "Fault",
            on_enter: Some(fault_enter),
            on_exit: None,
            on_update: fault_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFFLINE state
// ═══════════════════════════════════════════════════════════════════════════

fn offline_enter(_ctx: &mut FsmContext) {
    info!("Offline: waiting for WiFi + IoT hub before calibrating");
}

fn offline_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.link_up.then_some(StateId::Calibrating)
}

// ═══════════════════════════════════════════════════════════════════════════
//  CALIBRATING state
// ═══════════════════════════════════════════════════════════════════════════

fn calibrating_enter(ctx: &mut FsmContext) {
    ctx.calibrator.reset();
    ctx.detector = None;
    info!(
        "Calibrating: need {} stable samples (threshold {})",
        ctx.config.required_stable_samples, ctx.config.stability_threshold
    );
}

fn calibrating_update(ctx: &mut FsmContext) -> Option<StateId> {
    let timeout = ctx.config.calibration_timeout_secs;
    if timeout > 0 && ctx.secs_in_state() >= timeout as f32 {
        warn!("Calibrating: no stable field after {}s, restarting", timeout);
        ctx.outputs.calibration_restarted = true;
        // Re-entering resets the calibrator via `calibrating_enter`.
        return Some(StateId::Calibrating);
    }

    let sample = ctx.sample?;
    match ctx.calibrator.observe(sample) {
        CalibrationResult::Continue { .. } => {
            ctx.outputs.progress = Some(ctx.calibrator.progress());
            None
        }
        CalibrationResult::Done(baseline) => {
            info!("Calibrating: baseline fixed at {:.1}", baseline.value());
            ctx.detector = Some(DoorStateDetector::new(
                baseline,
                ctx.config.hysteresis_delta,
                ctx.config.initial_door_state,
            ));
            ctx.outputs.calibrated = Some(baseline);
            Some(StateId::Monitoring)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING state
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_enter(ctx: &mut FsmContext) {
    match ctx.detector.as_ref() {
        Some(d) => info!(
            "Monitoring: threshold {:.1}, door assumed {}",
            d.threshold(),
            d.state()
        ),
        None => {
            error!("Monitoring entered without a baseline");
            ctx.fault = Some(DetectorError::NotCalibrated.into());
        }
    }
}

fn monitoring_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.fault.is_some() {
        return Some(StateId::Fault);
    }
    let Some(detector) = ctx.detector.as_mut() else {
        ctx.fault = Some(DetectorError::NotCalibrated.into());
        return Some(StateId::Fault);
    };

    let sample = ctx.sample?;
    let (_, transition) = detector.evaluate(&sample);
    ctx.outputs.magnitude = detector.last_magnitude();
    ctx.outputs.transition = transition;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT state
// ═══════════════════════════════════════════════════════════════════════════

fn fault_enter(ctx: &mut FsmContext) {
    match ctx.fault {
        Some(e) => error!("Fault: {}, detection halted", e),
        None => error!("Fault: detection halted"),
    }
}

fn fault_update(_ctx: &mut FsmContext) -> Option<StateId> {
    None
}
