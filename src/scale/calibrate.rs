//! Pixel-to-real-world conversion factors.

use crate::beam::bars::RebarBar;
use crate::errors::TakeoffError;
use serde::Serialize;

/// A pixel→inches conversion derived from one known reference dimension.
///
/// Constructed only through [`ScaleCalibration::new`], which rejects a
/// degenerate reference so `factor > 0` holds for every live value.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ScaleCalibration {
    pub pixel_length: f32,
    pub real_length_in: f32,
    pub factor: f32,
}

impl ScaleCalibration {
    pub fn new(pixel_length: f32, real_length_in: f32) -> Result<Self, TakeoffError> {
        if !(pixel_length > 0.0) {
            return Err(TakeoffError::Calibration { pixel_length });
        }
        if !(real_length_in > 0.0) {
            return Err(TakeoffError::Validation {
                message: format!("non-positive reference dimension: {real_length_in}in"),
            });
        }
        Ok(Self {
            pixel_length,
            real_length_in,
            factor: real_length_in / pixel_length,
        })
    }

    /// Converts a pixel length to inches.
    pub fn to_inches(&self, pixels: f32) -> f32 {
        pixels * self.factor
    }
}

/// Per-axis calibration for a drawing: horizontal runs and vertical hooks
/// are measured against different reference scales.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DrawingScale {
    pub horizontal: ScaleCalibration,
    pub vertical: ScaleCalibration,
}

/// Real-world lengths of one reconstructed bar.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct BarInches {
    pub horizontal_in: f32,
    pub hook_in: f32,
    pub total_in: f32,
}

impl DrawingScale {
    /// Converts a bar's pixel lengths, applying the horizontal factor to the
    /// run and the vertical factor to the hooks.
    pub fn bar_inches(&self, bar: &RebarBar) -> BarInches {
        let horizontal_in = self.horizontal.to_inches(bar.horizontal_length);
        let hook_in = self.vertical.to_inches(bar.hook_length);
        BarInches {
            horizontal_in,
            hook_in,
            total_in: horizontal_in + hook_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::bars::{BarClass, RebarBar};
    use crate::segments::Segment;

    #[test]
    fn factor_from_reference_dimension() {
        let cal = ScaleCalibration::new(96.0, 33.0).unwrap();
        assert!((cal.factor - 0.34375).abs() < 1e-6);
        assert!((cal.to_inches(48.0) - 16.5).abs() < 1e-4);
    }

    #[test]
    fn zero_pixel_reference_is_rejected() {
        let err = ScaleCalibration::new(0.0, 33.0).unwrap_err();
        assert!(matches!(err, TakeoffError::Calibration { .. }));
    }

    #[test]
    fn negative_real_dimension_is_rejected() {
        assert!(ScaleCalibration::new(96.0, -1.0).is_err());
    }

    #[test]
    fn drawing_scale_applies_per_axis_factors() {
        let scale = DrawingScale {
            horizontal: ScaleCalibration::new(96.0, 33.0).unwrap(),
            vertical: ScaleCalibration::new(148.0, 24.0).unwrap(),
        };
        let bar = RebarBar::assemble(
            Segment::from_coords(0.0, 100.0, 96.0, 100.0),
            Some(Segment::from_coords(0.0, 100.0, 0.0, 174.0)),
            None,
            BarClass::TopSteel,
        );
        let inches = scale.bar_inches(&bar);
        assert!((inches.horizontal_in - 33.0).abs() < 1e-4);
        assert!((inches.hook_in - 12.0).abs() < 1e-4);
        assert!((inches.total_in - 45.0).abs() < 1e-4);
    }
}
