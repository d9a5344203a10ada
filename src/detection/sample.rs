//! One magnetometer reading.

/// Three-axis magnetic field reading in milli-gauss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Sample {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean field magnitude `sqrt(x² + y² + z²)`.
    ///
    /// Computed in `f64` so that squaring large raw values cannot overflow.
    pub fn magnitude(&self) -> f64 {
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        let z = f64::from(self.z);
        (x * x + y * y + z * z).sqrt()
    }

    /// True if every axis differs from `other` by strictly less than `threshold`.
    pub fn is_within(&self, other: &Sample, threshold: u32) -> bool {
        self.x.abs_diff(other.x) < threshold
            && self.y.abs_diff(other.y) < threshold
            && self.z.abs_diff(other.z) < threshold
    }
}

impl From<[i32; 3]> for Sample {
    fn from(axes: [i32; 3]) -> Self {
        Self::new(axes[0], axes[1], axes[2])
    }
}
