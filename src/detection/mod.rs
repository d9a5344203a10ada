//! Door detection core: pure numeric logic, zero I/O.
//!
//! ```text
//!  Sample ──▶ Calibrator ──(Done)──▶ Baseline ──▶ DoorStateDetector ──▶ Transition
//!             (startup only)                        (every poll)
//! ```
//!
//! The [`Calibrator`] waits for the magnetometer to settle and produces a
//! [`Baseline`], the field magnitude that means "door closed".  The
//! [`DoorStateDetector`] can only be built from a `Baseline`, so door
//! evaluation before calibration is unrepresentable at this layer.

pub mod calibrator;
pub mod detector;
pub mod sample;

pub use calibrator::{Baseline, CalibrationProgress, CalibrationResult, Calibrator};
pub use detector::{DoorState, DoorStateDetector, Transition};
pub use sample::Sample;
