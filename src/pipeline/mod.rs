//! Takeoff pipeline orchestrating the per-region stages.
//!
//! Overview
//! - [`analyze_beam`] turns a color-isolated beam mask plus the unmasked beam
//!   raster into classified, dimensioned bars: detect → partition → merge
//!   horizontals → estimate the center height → reconstruct.
//! - [`analyze_column`] extracts labeled tie layers above the beam midline.
//! - [`calibrate_scale_region`] reads a scale region: OCR the dimension text,
//!   find the reference line below it, derive the pixel→inches factor.
//! - [`analyze_beams`] fans independent beam regions out across threads;
//!   regions share nothing, so the batch is embarrassingly parallel.
//!
//! Every stage returns new collections; no stage mutates another's output.

mod params;

pub use params::TakeoffParams;

use crate::beam::{center_height, reconstruct_bars};
use crate::collaborators::{LineDetector, TextRecognizer};
use crate::column::{extract_tie_layers, tie_measurements};
use crate::errors::TakeoffError;
use crate::scale::{parse_measurement_checked, ScaleCalibration};
use crate::segments::{
    merge_segments, partition_by_orientation, sort_by_length_desc, Axis, Orientation, Segment,
};
use crate::types::{BeamAnalysis, ColumnAnalysis};
use image::GrayImage;
use log::debug;
use rayon::prelude::*;

/// Reconstructs the dimensioned bars of one beam region.
///
/// `mask` is the color-isolated raster the bar geometry is read from;
/// `full_image` is the unmasked beam raster whose long horizontal edges
/// define the center height. An empty detection on the mask degrades to an
/// empty analysis with `lines_found == false`.
pub fn analyze_beam(
    detector: &dyn LineDetector,
    mask: &GrayImage,
    full_image: &GrayImage,
    params: &TakeoffParams,
) -> Result<BeamAnalysis, TakeoffError> {
    ensure_nonempty(mask, "beam mask")?;
    ensure_nonempty(full_image, "beam image")?;

    let center_y = center_height(&detector.detect_lines(full_image), &params.center)?;

    let raw = detector.detect_lines(mask);
    if raw.is_empty() {
        debug!("analyze_beam: detector returned no lines for the mask");
        return Ok(BeamAnalysis {
            lines_found: false,
            center_y,
            bars: Vec::new(),
        });
    }

    let (horizontals, verticals) = canonical_segments(&raw, params);
    let bars = reconstruct_bars(&horizontals, &verticals, center_y, &params.bars);
    debug!(
        "analyze_beam: {} raw segment(s) -> {} bar(s), center_y={center_y:.1}",
        raw.len(),
        bars.len()
    );

    Ok(BeamAnalysis {
        lines_found: true,
        center_y,
        bars,
    })
}

/// Extracts the labeled, calibrated tie layers of one column region.
pub fn analyze_column(
    detector: &dyn LineDetector,
    mask: &GrayImage,
    center_y: f32,
    calibration: &ScaleCalibration,
    params: &TakeoffParams,
) -> Result<ColumnAnalysis, TakeoffError> {
    ensure_nonempty(mask, "column mask")?;

    let raw = detector.detect_lines(mask);
    if raw.is_empty() {
        debug!("analyze_column: detector returned no lines for the mask");
        return Ok(ColumnAnalysis {
            lines_found: false,
            ties: Vec::new(),
        });
    }

    let (horizontals, _) = canonical_segments(&raw, params);
    let layers = extract_tie_layers(&horizontals, center_y, &params.ties);
    Ok(ColumnAnalysis {
        lines_found: true,
        ties: tie_measurements(&layers, calibration),
    })
}

/// Derives a pixel→inches calibration from a scale region: recognized
/// dimension text above, the longest horizontal reference line below it.
pub fn calibrate_scale_region(
    detector: &dyn LineDetector,
    recognizer: &dyn TextRecognizer,
    raster: &GrayImage,
    params: &TakeoffParams,
) -> Result<ScaleCalibration, TakeoffError> {
    ensure_nonempty(raster, "scale region")?;

    let mut texts = recognizer.recognize(raster);
    texts.sort_by(|a, b| {
        a.bounds
            .x_min
            .partial_cmp(&b.bounds.x_min)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let below_y = texts
        .iter()
        .map(|t| t.bounds.y_max)
        .fold(0.0f32, f32::max);
    let joined = texts
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let inches = parse_measurement_checked(&joined)?;

    let segments = detector.detect_lines(raster);
    let reference = longest_reference_line(
        &segments,
        below_y,
        params.orientation_max_deviation,
    )
    .ok_or(TakeoffError::Calibration { pixel_length: 0.0 })?;
    debug!(
        "calibrate_scale_region: reference {:.1}px, dimension {:.2}in",
        reference.length(),
        inches
    );

    ScaleCalibration::new(reference.length(), inches)
}

/// The longest horizontal segment lying entirely below `below_y`, the usual
/// position of a scale's reference line relative to its dimension text.
pub fn longest_reference_line(
    segments: &[Segment],
    below_y: f32,
    max_deviation: f32,
) -> Option<Segment> {
    segments
        .iter()
        .filter(|seg| {
            seg.orientation(max_deviation) == Orientation::Horizontal
                && seg.p0.y > below_y
                && seg.p1.y > below_y
        })
        .max_by(|a, b| {
            a.length()
                .partial_cmp(&b.length())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .copied()
}

/// Analyzes independent beam regions in parallel. Pairs are
/// `(mask, full_image)` as for [`analyze_beam`].
pub fn analyze_beams<D: LineDetector + Sync>(
    detector: &D,
    regions: &[(GrayImage, GrayImage)],
    params: &TakeoffParams,
) -> Vec<Result<BeamAnalysis, TakeoffError>> {
    regions
        .par_iter()
        .map(|(mask, full_image)| analyze_beam(detector, mask, full_image, params))
        .collect()
}

/// Sorted, merged horizontals plus sorted verticals: the canonical inputs to
/// the reconstruction stages. Sorting by length descending keeps the
/// merger's first-match rule deterministic.
fn canonical_segments(raw: &[Segment], params: &TakeoffParams) -> (Vec<Segment>, Vec<Segment>) {
    let groups = partition_by_orientation(raw, params.orientation_max_deviation);

    let mut horizontals = groups.horizontal;
    sort_by_length_desc(&mut horizontals);
    let mut horizontals = merge_segments(&horizontals, Axis::Horizontal, &params.merge);
    sort_by_length_desc(&mut horizontals);

    let mut verticals = groups.vertical;
    sort_by_length_desc(&mut verticals);

    (horizontals, verticals)
}

fn ensure_nonempty(raster: &GrayImage, context: &str) -> Result<(), TakeoffError> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(TakeoffError::Input {
            context: format!("{context} is {}x{}", raster.width(), raster.height()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{RegionBox, TextDetection};

    struct FixedLines(Vec<Segment>);

    impl LineDetector for FixedLines {
        fn detect_lines(&self, _raster: &GrayImage) -> Vec<Segment> {
            self.0.clone()
        }
    }

    struct FixedText(Vec<TextDetection>);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _raster: &GrayImage) -> Vec<TextDetection> {
            self.0.clone()
        }
    }

    fn raster() -> GrayImage {
        GrayImage::new(64, 64)
    }

    #[test]
    fn empty_raster_is_an_input_error() {
        let detector = FixedLines(Vec::new());
        let empty = GrayImage::new(0, 0);
        let err = analyze_beam(&detector, &empty, &raster(), &TakeoffParams::default());
        assert!(matches!(err, Err(TakeoffError::Input { .. })));
    }

    #[test]
    fn no_detected_lines_degrades_not_crashes() {
        // The full image carries beam edges; the mask has nothing.
        struct Split;
        impl LineDetector for Split {
            fn detect_lines(&self, raster: &GrayImage) -> Vec<Segment> {
                if raster.width() > 100 {
                    vec![
                        Segment::from_coords(0.0, 50.0, 300.0, 50.0),
                        Segment::from_coords(0.0, 250.0, 300.0, 250.0),
                    ]
                } else {
                    Vec::new()
                }
            }
        }
        let analysis = analyze_beam(
            &Split,
            &GrayImage::new(64, 64),
            &GrayImage::new(400, 300),
            &TakeoffParams::default(),
        )
        .unwrap();
        assert!(!analysis.lines_found);
        assert!(analysis.bars.is_empty());
        assert_eq!(analysis.center_y, 150.0);
    }

    #[test]
    fn scale_region_calibration_end_to_end() {
        let detector = FixedLines(vec![
            // Reference line below the text.
            Segment::from_coords(10.0, 40.0, 106.0, 40.0),
            // Decoy above the text band.
            Segment::from_coords(0.0, 5.0, 400.0, 5.0),
        ]);
        let recognizer = FixedText(vec![TextDetection {
            text: "2'-9\"".to_string(),
            bounds: RegionBox {
                x_min: 10.0,
                y_min: 2.0,
                x_max: 60.0,
                y_max: 20.0,
            },
            confidence: 0.9,
        }]);
        let cal =
            calibrate_scale_region(&detector, &recognizer, &raster(), &TakeoffParams::default())
                .unwrap();
        assert!((cal.pixel_length - 96.0).abs() < 1e-4);
        assert!((cal.real_length_in - 33.0).abs() < 1e-4);
        assert!((cal.factor - 0.34375).abs() < 1e-5);
    }

    #[test]
    fn unparseable_dimension_text_is_surfaced() {
        let detector = FixedLines(vec![Segment::from_coords(10.0, 40.0, 106.0, 40.0)]);
        let recognizer = FixedText(vec![TextDetection {
            text: "105".to_string(),
            bounds: RegionBox {
                x_min: 10.0,
                y_min: 2.0,
                x_max: 60.0,
                y_max: 20.0,
            },
            confidence: 0.9,
        }]);
        let err =
            calibrate_scale_region(&detector, &recognizer, &raster(), &TakeoffParams::default())
                .unwrap_err();
        assert!(matches!(err, TakeoffError::NoMeasurementFound { .. }));
    }
}
