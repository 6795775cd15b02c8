//! Beam center-height estimation.

use crate::errors::TakeoffError;
use crate::segments::{Orientation, Segment};
use log::debug;
use serde::{Deserialize, Serialize};

/// Filters applied when picking the beam's reference edges.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterOptions {
    /// Minimum length (px) for a horizontal segment to count as a beam edge.
    pub min_reference_length: f32,
    /// Axis deviation tolerance for the horizontality test. Wider than the
    /// classifier default: beam outlines on full-resolution drawings sag more
    /// than the short annotation strokes do.
    pub max_deviation: f32,
}

impl Default for CenterOptions {
    fn default() -> Self {
        Self {
            min_reference_length: 100.0,
            max_deviation: 10.0,
        }
    }
}

/// Returns the y midpoint between the topmost and bottommost qualifying
/// horizontal segment of the full (unmasked) beam image.
///
/// This line is the top/bottom reinforcement boundary for the whole beam.
/// Fails with [`TakeoffError::NoReferenceLine`] when nothing qualifies.
pub fn center_height(segments: &[Segment], options: &CenterOptions) -> Result<f32, TakeoffError> {
    let mut top: Option<f32> = None;
    let mut bottom: Option<f32> = None;
    for seg in segments {
        if seg.orientation(options.max_deviation) != Orientation::Horizontal
            || seg.length() < options.min_reference_length
        {
            continue;
        }
        let y = seg.p0.y;
        top = Some(top.map_or(y, |t: f32| t.min(y)));
        bottom = Some(bottom.map_or(y, |b: f32| b.max(y)));
    }

    match (top, bottom) {
        (Some(top), Some(bottom)) => {
            let center = 0.5 * (top + bottom);
            debug!("center_height: top={top:.1} bottom={bottom:.1} center={center:.1}");
            Ok(center)
        }
        _ => Err(TakeoffError::NoReferenceLine {
            minimum_length: options.min_reference_length,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midline_between_extreme_edges() {
        let segs = vec![
            Segment::from_coords(0.0, 100.0, 300.0, 100.0),
            Segment::from_coords(0.0, 300.0, 300.0, 300.0),
            // Too short to qualify as a beam edge.
            Segment::from_coords(0.0, 500.0, 50.0, 500.0),
        ];
        let center = center_height(&segs, &CenterOptions::default()).unwrap();
        assert_eq!(center, 200.0);
    }

    #[test]
    fn no_qualifying_edge_is_an_error() {
        let segs = vec![Segment::from_coords(0.0, 0.0, 40.0, 0.0)];
        let err = center_height(&segs, &CenterOptions::default()).unwrap_err();
        assert!(matches!(err, TakeoffError::NoReferenceLine { .. }));
    }

    #[test]
    fn vertical_segments_are_ignored() {
        let segs = vec![Segment::from_coords(10.0, 0.0, 10.0, 400.0)];
        assert!(center_height(&segs, &CenterOptions::default()).is_err());
    }
}
