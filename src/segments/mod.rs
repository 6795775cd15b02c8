//! Line-segment model and orientation classification.
//!
//! Overview
//! - [`Segment`] is the value type every stage exchanges: an ordered pair of
//!   endpoints. Derived quantities (length, orientation) are recomputed from
//!   the endpoints on demand and never stored, so they cannot go stale when a
//!   merge rewrites the extent.
//! - [`partition_by_orientation`] splits raw detector output into horizontal,
//!   vertical and slanted groups. The vertical test runs first, so a
//!   degenerate point-like detection classifies as vertical.
//! - [`merge`] collapses near-duplicate same-orientation segments into
//!   canonical ones by iterating a proximity pass to a fixpoint.

mod merge;

pub use merge::{merge_segments, Axis, MergeOptions};

use nalgebra::{distance, Point2};
use serde::{Deserialize, Serialize};

/// Default maximum axis deviation (px) for the horizontal/vertical tests.
pub const DEFAULT_MAX_DEVIATION: f32 = 5.0;

/// Coarse orientation class of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Slanted,
}

/// Ordered pair of endpoints in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p0: Point2<f32>,
    pub p1: Point2<f32>,
}

impl Segment {
    pub fn new(p0: Point2<f32>, p1: Point2<f32>) -> Self {
        Self { p0, p1 }
    }

    /// Convenience constructor from raw endpoint coordinates.
    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    /// Euclidean distance between the endpoints.
    pub fn length(&self) -> f32 {
        distance(&self.p0, &self.p1)
    }

    pub fn midpoint(&self) -> Point2<f32> {
        nalgebra::center(&self.p0, &self.p1)
    }

    /// Mean of the endpoint y coordinates.
    pub fn mean_y(&self) -> f32 {
        0.5 * (self.p0.y + self.p1.y)
    }

    /// Classifies the segment given the maximum allowed axis deviation.
    ///
    /// The vertical test takes precedence: a segment whose endpoints differ
    /// by at most `max_deviation` in x is vertical even if its y spread is
    /// also within tolerance.
    pub fn orientation(&self, max_deviation: f32) -> Orientation {
        if (self.p0.x - self.p1.x).abs() <= max_deviation {
            Orientation::Vertical
        } else if (self.p0.y - self.p1.y).abs() <= max_deviation {
            Orientation::Horizontal
        } else {
            Orientation::Slanted
        }
    }
}

/// Raw segments partitioned by orientation class.
#[derive(Clone, Debug, Default, Serialize)]
pub struct OrientationGroups {
    pub horizontal: Vec<Segment>,
    pub vertical: Vec<Segment>,
    pub slanted: Vec<Segment>,
}

/// Partitions segments into the three orientation groups.
///
/// Total: every input lands in exactly one group.
pub fn partition_by_orientation(segments: &[Segment], max_deviation: f32) -> OrientationGroups {
    let mut groups = OrientationGroups::default();
    for seg in segments {
        match seg.orientation(max_deviation) {
            Orientation::Horizontal => groups.horizontal.push(*seg),
            Orientation::Vertical => groups.vertical.push(*seg),
            Orientation::Slanted => groups.slanted.push(*seg),
        }
    }
    groups
}

/// Sorts segments by length, longest first.
///
/// This is the canonical input ordering expected by the merger and the bar
/// reconstructor; the merger's "first match absorbs" rule makes the output
/// depend on it.
pub fn sort_by_length_desc(segments: &mut [Segment]) {
    segments.sort_by(|a, b| {
        b.length()
            .partial_cmp(&a.length())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_rule_matches_axis_tolerances() {
        let v = Segment::from_coords(10.0, 0.0, 12.0, 80.0);
        assert_eq!(v.orientation(5.0), Orientation::Vertical);

        let h = Segment::from_coords(0.0, 10.0, 80.0, 12.0);
        assert_eq!(h.orientation(5.0), Orientation::Horizontal);

        let s = Segment::from_coords(0.0, 0.0, 40.0, 40.0);
        assert_eq!(s.orientation(5.0), Orientation::Slanted);
    }

    #[test]
    fn degenerate_segment_classifies_vertical() {
        // dx = dy = 0: the vertical test wins by precedence.
        let point = Segment::from_coords(7.0, 7.0, 7.0, 7.0);
        assert_eq!(point.orientation(5.0), Orientation::Vertical);
    }

    #[test]
    fn partition_is_exhaustive() {
        let segs = vec![
            Segment::from_coords(0.0, 0.0, 100.0, 2.0),
            Segment::from_coords(0.0, 0.0, 2.0, 100.0),
            Segment::from_coords(0.0, 0.0, 50.0, 50.0),
            Segment::from_coords(5.0, 5.0, 5.0, 5.0),
        ];
        let groups = partition_by_orientation(&segs, 5.0);
        assert_eq!(
            groups.horizontal.len() + groups.vertical.len() + groups.slanted.len(),
            segs.len()
        );
        assert_eq!(groups.horizontal.len(), 1);
        assert_eq!(groups.vertical.len(), 2);
        assert_eq!(groups.slanted.len(), 1);
    }

    #[test]
    fn sort_desc_orders_longest_first() {
        let mut segs = vec![
            Segment::from_coords(0.0, 0.0, 10.0, 0.0),
            Segment::from_coords(0.0, 0.0, 100.0, 0.0),
            Segment::from_coords(0.0, 0.0, 50.0, 0.0),
        ];
        sort_by_length_desc(&mut segs);
        assert_eq!(segs[0].length(), 100.0);
        assert_eq!(segs[2].length(), 10.0);
    }
}
