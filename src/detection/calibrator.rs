//! Startup calibration: wait for the field to settle, then fix the baseline.
//!
//! The calibrator is an explicit state machine advanced once per poll.
//! The first observed sample seeds the reference.  Each later sample is
//! compared axis-by-axis against the reference: if all three deltas are
//! below the stability threshold the stable counter advances, otherwise
//! the counter resets and the sample becomes the new reference.  After
//! `required` consecutive stable samples the reference's magnitude is the
//! [`Baseline`].
//!
//! There is no internal timeout.  A field that never settles keeps
//! returning [`CalibrationResult::Continue`]; bounding that is driver
//! policy.

use super::sample::Sample;

/// Default per-axis stability threshold (raw units).
pub const DEFAULT_STABILITY_THRESHOLD: u32 = 10;

/// Default number of consecutive stable samples required.
pub const DEFAULT_REQUIRED_STABLE: u32 = 5;

/// Calibrated "door closed" field magnitude.  Non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Baseline(f64);

impl Baseline {
    /// Baseline from an explicit magnitude.  Rejects negative and
    /// non-finite values.
    pub fn new(magnitude: f64) -> Option<Self> {
        (magnitude.is_finite() && magnitude >= 0.0).then_some(Self(magnitude))
    }

    pub fn from_sample(sample: &Sample) -> Self {
        Self(sample.magnitude())
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Outcome of one [`Calibrator::observe`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationResult {
    /// Still settling; `remaining` more stable samples are needed.
    Continue { remaining: u32 },
    /// Calibration finished.
    Done(Baseline),
}

/// Snapshot of calibration progress for display and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationProgress {
    pub stable: u32,
    pub required: u32,
}

impl CalibrationProgress {
    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.stable)
    }
}

pub struct Calibrator {
    stability_threshold: u32,
    required: u32,
    reference: Option<Sample>,
    stable_count: u32,
    baseline: Option<Baseline>,
}

impl Calibrator {
    /// `required` is clamped to at least one sample.
    pub fn new(stability_threshold: u32, required: u32) -> Self {
        Self {
            stability_threshold,
            required: required.max(1),
            reference: None,
            stable_count: 0,
            baseline: None,
        }
    }

    /// Feed one sample.
    ///
    /// Once `Done` has been returned, further calls return the same
    /// baseline without touching the internal state.
    pub fn observe(&mut self, sample: Sample) -> CalibrationResult {
        if let Some(baseline) = self.baseline {
            return CalibrationResult::Done(baseline);
        }

        let Some(reference) = self.reference else {
            self.reference = Some(sample);
            return CalibrationResult::Continue { remaining: self.remaining() };
        };

        if sample.is_within(&reference, self.stability_threshold) {
            self.stable_count += 1;
            if self.stable_count >= self.required {
                let baseline = Baseline::from_sample(&reference);
                self.baseline = Some(baseline);
                return CalibrationResult::Done(baseline);
            }
        } else {
            self.stable_count = 0;
            self.reference = Some(sample);
        }

        CalibrationResult::Continue { remaining: self.remaining() }
    }

    /// Discard all progress, including a finished baseline.
    pub fn reset(&mut self) {
        self.reference = None;
        self.stable_count = 0;
        self.baseline = None;
    }

    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    pub fn reference(&self) -> Option<Sample> {
        self.reference
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    pub fn is_done(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn progress(&self) -> CalibrationProgress {
        CalibrationProgress {
            stable: self.stable_count,
            required: self.required,
        }
    }

    fn remaining(&self) -> u32 {
        self.required - self.stable_count
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(DEFAULT_STABILITY_THRESHOLD, DEFAULT_REQUIRED_STABLE)
    }
}
