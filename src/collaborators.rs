//! External capabilities consumed by the pipeline.
//!
//! Detection models and OCR engines are expensive to construct and live
//! outside this crate. Each capability is a trait the caller implements and
//! passes into the pipeline stages explicitly; nothing here instantiates a
//! model or keeps process-wide state.

use crate::errors::TakeoffError;
use crate::segments::Segment;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Straight-line detection on a single-channel raster. May return nothing;
/// callers treat an empty result as a degraded analysis, not a failure.
pub trait LineDetector {
    fn detect_lines(&self, raster: &GrayImage) -> Vec<Segment>;
}

/// Locates beam/column/scale regions on a full drawing page.
pub trait RegionLocator {
    fn locate_regions(&self, page: &RgbImage) -> Vec<Region>;
}

/// Isolates one annotation color as a line-reconnected binary raster.
pub trait MaskExtractor {
    fn isolate_color(&self, image: &RgbImage, color: TargetColor)
        -> Result<GrayImage, TakeoffError>;
}

/// Text recognition over a raster region.
pub trait TextRecognizer {
    fn recognize(&self, raster: &GrayImage) -> Vec<TextDetection>;
}

/// Region classes produced by the object locator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Beam,
    Column,
    Scale,
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl RegionBox {
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Wider-than-tall boxes hold horizontal-type regions (e.g. a horizontal
    /// reference scale); the rest are vertical-type.
    pub fn is_landscape(&self) -> bool {
        self.width() > self.height()
    }

    /// Intersection-over-union with another box; 0 when disjoint.
    pub fn intersection_over_union(&self, other: &RegionBox) -> f32 {
        let ix = self.x_max.min(other.x_max) - self.x_min.max(other.x_min);
        let iy = self.y_max.min(other.y_max) - self.y_min.max(other.y_min);
        if ix <= 0.0 || iy <= 0.0 {
            return 0.0;
        }
        let intersection = ix * iy;
        let union = self.width() * self.height() + other.width() * other.height() - intersection;
        intersection / union
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &RegionBox) -> RegionBox {
        RegionBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// One located drawing region.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    pub bounds: RegionBox,
    pub confidence: f32,
}

/// One recognized text fragment with its location and confidence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextDetection {
    pub text: String,
    pub bounds: RegionBox,
    pub confidence: f32,
}

/// Annotation colors the mask extractor supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Orange,
    Purple,
    Black,
}

impl FromStr for TargetColor {
    type Err = TakeoffError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "red" => Ok(TargetColor::Red),
            "green" => Ok(TargetColor::Green),
            "blue" => Ok(TargetColor::Blue),
            "yellow" => Ok(TargetColor::Yellow),
            "cyan" => Ok(TargetColor::Cyan),
            "magenta" => Ok(TargetColor::Magenta),
            "orange" => Ok(TargetColor::Orange),
            "purple" => Ok(TargetColor::Purple),
            "black" => Ok(TargetColor::Black),
            other => Err(TakeoffError::Validation {
                message: format!("unsupported color name '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_heuristic() {
        let wide = RegionBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 200.0,
            y_max: 40.0,
        };
        let tall = RegionBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 40.0,
            y_max: 200.0,
        };
        assert!(wide.is_landscape());
        assert!(!tall.is_landscape());
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = RegionBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 10.0,
            y_max: 10.0,
        };
        let b = RegionBox {
            x_min: 20.0,
            y_min: 20.0,
            x_max: 30.0,
            y_max: 30.0,
        };
        assert_eq!(a.intersection_over_union(&b), 0.0);
        let u = a.union(&b);
        assert_eq!(u.x_max, 30.0);
        assert_eq!(u.x_min, 0.0);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = RegionBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 10.0,
            y_max: 10.0,
        };
        assert!((a.intersection_over_union(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unsupported_color_is_a_validation_error() {
        assert!(TargetColor::from_str("yellow").is_ok());
        let err = TargetColor::from_str("teal").unwrap_err();
        assert!(matches!(err, TakeoffError::Validation { .. }));
    }
}
