use crate::error::AugmentError;
use crate::policy::Axis;

/// Shear angles at or beyond this magnitude (in degrees) are rejected.
pub const MAX_SHEAR_DEGREES: f64 = 60.0;

/// Shear angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShearParameters {
    /// Horizontal shear angle, displaces x proportionally to y.
    pub horizontal_degrees: f64,
    /// Vertical shear angle, displaces y proportionally to x.
    pub vertical_degrees: f64,
}

impl ShearParameters {
    /// Create new shear parameters.
    pub fn new(horizontal_degrees: f64, vertical_degrees: f64) -> Self {
        Self {
            horizontal_degrees,
            vertical_degrees,
        }
    }

    /// The angle in degrees for the given axis.
    pub fn degrees(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal_degrees,
            Axis::Vertical => self.vertical_degrees,
        }
    }

    /// The shear slope `tan(angle)` for the given axis.
    pub fn slope(&self, axis: Axis) -> f64 {
        self.degrees(axis).to_radians().tan()
    }

    /// Check that both angles are finite and below [`MAX_SHEAR_DEGREES`].
    pub fn validate(&self) -> Result<(), AugmentError> {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let angle = self.degrees(axis);
            if !angle.is_finite() || angle.abs() >= MAX_SHEAR_DEGREES {
                return Err(AugmentError::InvalidParameter(format!(
                    "{axis:?} shear angle must be finite and within \
                     (-{MAX_SHEAR_DEGREES}, {MAX_SHEAR_DEGREES}) degrees, got {angle}"
                )));
            }
        }
        Ok(())
    }
}

/// Perspective warp fractions.
///
/// The magnitude is the fraction of the compressed edge that is kept:
/// 1 leaves the rectangle unchanged, values toward 0 squeeze the edge
/// toward its midpoint. The sign selects which edge is compressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpParameters {
    /// Warp acting on the y coordinates of the left or right edge.
    pub vertical: f64,
    /// Warp acting on the x coordinates of the top or bottom edge.
    pub horizontal: f64,
}

impl Default for WarpParameters {
    fn default() -> Self {
        Self::identity()
    }
}

impl WarpParameters {
    /// Create new warp parameters.
    pub fn new(vertical: f64, horizontal: f64) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Warp parameters that leave the rectangle unchanged.
    pub fn identity() -> Self {
        Self::new(1.0, 1.0)
    }

    /// The warp fraction for the given axis.
    pub fn amount(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Check that both fractions are finite, non-zero and at most 1 in magnitude.
    pub fn validate(&self) -> Result<(), AugmentError> {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let amount = self.amount(axis);
            if !amount.is_finite() || amount == 0.0 || amount.abs() > 1.0 {
                return Err(AugmentError::InvalidParameter(format!(
                    "{axis:?} warp must be non-zero with magnitude at most 1, got {amount}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shear_validation() {
        assert!(ShearParameters::new(20.0, -20.0).validate().is_ok());
        assert!(ShearParameters::new(60.0, 0.0).validate().is_err());
        assert!(ShearParameters::new(0.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn warp_validation() {
        assert!(WarpParameters::new(0.65, -1.0).validate().is_ok());
        assert!(WarpParameters::new(0.0, 1.0).validate().is_err());
        assert!(WarpParameters::new(0.5, -1.2).validate().is_err());
        assert!(WarpParameters::new(f64::INFINITY, 0.5).validate().is_err());
    }

    #[test]
    fn shear_slope() {
        let params = ShearParameters::new(45.0, 0.0);
        approx::assert_relative_eq!(params.slope(Axis::Horizontal), 1.0, epsilon = 1e-12);
        assert_eq!(params.slope(Axis::Vertical), 0.0);
    }
}
