//! Synthetic segment fixtures shared by the integration tests.

use image::GrayImage;
use rebar_takeoff::collaborators::LineDetector;
use rebar_takeoff::segments::Segment;

pub fn h(x0: f32, x1: f32, y: f32) -> Segment {
    Segment::from_coords(x0, y, x1, y)
}

pub fn v(x: f32, y0: f32, y1: f32) -> Segment {
    Segment::from_coords(x, y0, x, y1)
}

/// Serves one canned segment set for wide rasters (the unmasked beam image)
/// and another for everything else (the color-isolated mask).
pub struct SplitDetector {
    pub full_image_lines: Vec<Segment>,
    pub mask_lines: Vec<Segment>,
}

impl LineDetector for SplitDetector {
    fn detect_lines(&self, raster: &GrayImage) -> Vec<Segment> {
        if raster.width() >= 400 {
            self.full_image_lines.clone()
        } else {
            self.mask_lines.clone()
        }
    }
}
