//! Proximity merging of same-orientation segments.
//!
//! A single pass folds segments into an accumulator: each candidate joins the
//! first already-merged segment whose corresponding endpoints sit within the
//! along-axis distance and cross-axis deviation thresholds, widening that
//! segment to the bounding union. Unmatched candidates open new entries. The
//! pass repeats until the segment count stops shrinking.
//!
//! The fixpoint is reached by an explicit loop with a hard pass cap (bounded
//! by the input size): the union operation never increases the count, so a
//! pass that fails to shrink *is* the fixpoint, not an error.

use super::Segment;
use log::debug;
use serde::{Deserialize, Serialize};

/// Merge axis. Horizontal merging measures endpoint distance along x and
/// deviation along y; vertical merging swaps the roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Thresholds controlling when two segments collapse into one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Maximum along-axis gap between corresponding endpoints (px).
    pub max_endpoint_distance: f32,
    /// Maximum cross-axis deviation between corresponding endpoints (px).
    pub max_cross_deviation: f32,
    /// Pass cap; `None` bounds the loop by the input segment count.
    pub max_passes: Option<usize>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_endpoint_distance: 20.0,
            max_cross_deviation: 15.0,
            max_passes: None,
        }
    }
}

/// Merges near-duplicate segments to a fixpoint.
///
/// Merge order is input order, and ties on which existing segment absorbs a
/// candidate go to the first match in iteration order; callers wanting
/// deterministic output must hand in a stable ordering (sorted by length,
/// descending, is the convention used downstream).
pub fn merge_segments(segments: &[Segment], axis: Axis, options: &MergeOptions) -> Vec<Segment> {
    let cap = options.max_passes.unwrap_or_else(|| segments.len().max(1));
    let mut current = segments.to_vec();
    let mut passes = 0usize;
    for _ in 0..cap {
        let merged = merge_pass(&current, axis, options);
        passes += 1;
        let shrunk = merged.len() < current.len();
        current = merged;
        if !shrunk {
            break;
        }
    }
    debug!(
        "merge_segments: {} -> {} segments after {} pass(es)",
        segments.len(),
        current.len(),
        passes
    );
    current
}

fn merge_pass(segments: &[Segment], axis: Axis, options: &MergeOptions) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::new();
    for seg in segments {
        let mut absorbed = false;
        for existing in merged.iter_mut() {
            if joins(seg, existing, axis, options) {
                *existing = bounding_union(seg, existing, axis);
                absorbed = true;
                break;
            }
        }
        if !absorbed {
            merged.push(*seg);
        }
    }
    merged
}

fn joins(seg: &Segment, existing: &Segment, axis: Axis, options: &MergeOptions) -> bool {
    let dist = options.max_endpoint_distance;
    let dev = options.max_cross_deviation;
    match axis {
        // Adjacency: the candidate's start against the existing end, or the
        // candidate's end against the existing start.
        Axis::Horizontal => {
            ((seg.p0.x - existing.p1.x).abs() < dist && (seg.p0.y - existing.p1.y).abs() < dev)
                || ((seg.p1.x - existing.p0.x).abs() < dist
                    && (seg.p1.y - existing.p0.y).abs() < dev)
        }
        Axis::Vertical => {
            ((seg.p0.x - existing.p0.x).abs() < dev && (seg.p0.y - existing.p0.y).abs() < dist)
                || ((seg.p1.x - existing.p1.x).abs() < dev
                    && (seg.p1.y - existing.p1.y).abs() < dist)
        }
    }
}

/// Union extent along the axis; cross-axis coordinates come from the
/// incoming candidate.
fn bounding_union(seg: &Segment, existing: &Segment, axis: Axis) -> Segment {
    match axis {
        Axis::Horizontal => Segment::from_coords(
            seg.p0.x.min(existing.p0.x),
            seg.p0.y,
            seg.p1.x.max(existing.p1.x),
            seg.p1.y,
        ),
        Axis::Vertical => Segment::from_coords(
            seg.p0.x,
            seg.p0.y.min(existing.p0.y),
            seg.p1.x,
            seg.p1.y.max(existing.p1.y),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(x0: f32, x1: f32, y: f32) -> Segment {
        Segment::from_coords(x0, y, x1, y)
    }

    #[test]
    fn adjacent_horizontal_fragments_collapse() {
        let segs = vec![h(0.0, 100.0, 50.0), h(110.0, 200.0, 52.0)];
        let merged = merge_segments(&segs, Axis::Horizontal, &MergeOptions::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].p0.x, 0.0);
        assert_eq!(merged[0].p1.x, 200.0);
    }

    #[test]
    fn distant_segments_stay_apart() {
        let segs = vec![h(0.0, 100.0, 50.0), h(300.0, 400.0, 50.0)];
        let merged = merge_segments(&segs, Axis::Horizontal, &MergeOptions::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let segs = vec![
            h(0.0, 90.0, 10.0),
            h(95.0, 180.0, 12.0),
            h(185.0, 260.0, 11.0),
            h(0.0, 50.0, 400.0),
        ];
        let once = merge_segments(&segs, Axis::Horizontal, &MergeOptions::default());
        let twice = merge_segments(&once, Axis::Horizontal, &MergeOptions::default());
        assert_eq!(once, twice, "fixpoint output must be stable under re-merge");
    }

    #[test]
    fn vertical_near_duplicates_collapse_along_y() {
        let segs = vec![
            Segment::from_coords(40.0, 0.0, 40.0, 60.0),
            Segment::from_coords(42.0, 5.0, 42.0, 70.0),
        ];
        let merged = merge_segments(&segs, Axis::Vertical, &MergeOptions::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].p0.y, 0.0);
        assert_eq!(merged[0].p1.y, 70.0);
    }

    #[test]
    fn pass_cap_bounds_the_loop() {
        // Out-of-order fragments need a second pass to fully collapse; the
        // cap makes a non-shrinking pass the stopping condition either way.
        let segs = vec![h(0.0, 10.0, 5.0), h(30.0, 40.0, 5.0), h(15.0, 25.0, 5.0)];
        let capped = merge_segments(
            &segs,
            Axis::Horizontal,
            &MergeOptions {
                max_passes: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(capped.len(), 2);

        let full = merge_segments(&segs, Axis::Horizontal, &MergeOptions::default());
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn permutations_cover_the_same_extent() {
        let segs = vec![h(0.0, 90.0, 10.0), h(100.0, 190.0, 10.0), h(200.0, 290.0, 10.0)];
        let mut reversed = segs.clone();
        reversed.reverse();

        let a = merge_segments(&segs, Axis::Horizontal, &MergeOptions::default());
        let b = merge_segments(&reversed, Axis::Horizontal, &MergeOptions::default());

        // Individual boundaries may differ under the first-match rule, but the
        // covered x-extent must agree.
        let span = |v: &[Segment]| {
            let lo = v.iter().map(|s| s.p0.x.min(s.p1.x)).fold(f32::MAX, f32::min);
            let hi = v.iter().map(|s| s.p0.x.max(s.p1.x)).fold(f32::MIN, f32::max);
            (lo, hi)
        };
        assert_eq!(span(&a), span(&b));
    }
}
