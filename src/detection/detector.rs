//! Door state detection with a latching threshold.
//!
//! A single threshold `baseline - delta` is used for both directions:
//!
//! | Current | Condition                        | Next   |
//! |---------|----------------------------------|--------|
//! | Closed  | `magnitude <= baseline - delta`  | Open   |
//! | Open    | `magnitude >= baseline - delta`  | Closed |
//!
//! A magnet moving away from the sensor lowers the field magnitude, so an
//! open door reads well below the calibrated baseline.
//!
//! Both checks share one threshold, so a sample exactly on the threshold
//! while Open re-closes the door.  Moving to a two-threshold band must be
//! confirmed against real hardware first.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::calibrator::Baseline;
use super::sample::Sample;

/// Default hysteresis margin (magnitude units).
pub const DEFAULT_HYSTERESIS_DELTA: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DoorState {
    #[default]
    Closed,
    Open,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
        }
    }
}

/// A reported change of door state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DoorState,
    pub to: DoorState,
}

pub struct DoorStateDetector {
    baseline: Baseline,
    delta: f64,
    state: DoorState,
    last_magnitude: Option<f64>,
}

impl DoorStateDetector {
    pub fn new(baseline: Baseline, delta: f64, initial: DoorState) -> Self {
        Self {
            baseline,
            delta,
            state: initial,
            last_magnitude: None,
        }
    }

    /// Detector with the default margin, starting Closed.
    pub fn with_defaults(baseline: Baseline) -> Self {
        Self::new(baseline, DEFAULT_HYSTERESIS_DELTA, DoorState::Closed)
    }

    /// Evaluate one sample.  Returns the (possibly new) state and the
    /// transition, if the state changed on this sample.
    pub fn evaluate(&mut self, sample: &Sample) -> (DoorState, Option<Transition>) {
        let magnitude = sample.magnitude();
        self.last_magnitude = Some(magnitude);
        let threshold = self.threshold();

        let next = match self.state {
            DoorState::Closed if magnitude <= threshold => DoorState::Open,
            DoorState::Open if magnitude >= threshold => DoorState::Closed,
            current => current,
        };

        if next == self.state {
            return (self.state, None);
        }

        let transition = Transition {
            from: self.state,
            to: next,
        };
        self.state = next;
        (next, Some(transition))
    }

    /// The shared switching threshold `baseline - delta`.
    pub fn threshold(&self) -> f64 {
        self.baseline.value() - self.delta
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Magnitude of the most recently evaluated sample.
    pub fn last_magnitude(&self) -> Option<f64> {
        self.last_magnitude
    }
}
