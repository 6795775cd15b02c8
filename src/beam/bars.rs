//! Reconstruction of dimensioned beam bars from canonical segments.
//!
//! A candidate main bar is a canonical horizontal segment. Vertical segments
//! qualifying as bent ends ("hooks") must both touch near an endpoint along x
//! and sit within an endpoint-to-endpoint distance of it; at most one hook is
//! kept per end, the candidate closest to the bar. Implausible pairings are
//! rejected by three gates: a minimum horizontal run, a minimum total length
//! and a cap on the hook share of the bar, which stops a vertical border or
//! scale line from masquerading as a hook.

use crate::segments::Segment;
use log::debug;
use serde::{Deserialize, Serialize};

/// Top/bottom reinforcement classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarClass {
    TopSteel,
    BottomSteel,
}

/// Thresholds controlling hook pairing, bar retention and collinear merging.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    /// Max x offset (px) between a vertical endpoint and a bar endpoint.
    pub endpoint_tolerance: f32,
    /// Max endpoint-to-endpoint distance (px) for a hook candidate.
    pub hook_distance_tolerance: f32,
    /// Bars with a horizontal run at or below this length (px) are dropped.
    pub min_horizontal_length: f32,
    /// Bars with a total length at or below this (px) are dropped.
    pub min_total_length: f32,
    /// Max hook length as a fraction of the horizontal run.
    pub max_hook_ratio: f32,
    /// Max y distance (px) between collinear bars eligible for merging.
    pub merge_y_tolerance: f32,
    /// Max x gap (px, smaller of the two end-to-end gaps) for merging.
    pub merge_x_gap: f32,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            endpoint_tolerance: 7.0,
            hook_distance_tolerance: 10.0,
            min_horizontal_length: 50.0,
            min_total_length: 150.0,
            max_hook_ratio: 0.8,
            merge_y_tolerance: 5.0,
            merge_x_gap: 50.0,
        }
    }
}

/// A reconstructed reinforcement bar.
///
/// Built through [`RebarBar::assemble`] so the length fields always satisfy
/// `total_length == horizontal_length + hook_length`.
#[derive(Clone, Debug, Serialize)]
pub struct RebarBar {
    pub horizontal: Segment,
    pub start_hook: Option<Segment>,
    pub end_hook: Option<Segment>,
    pub horizontal_length: f32,
    pub hook_length: f32,
    pub total_length: f32,
    pub class: BarClass,
}

impl RebarBar {
    /// Derives all lengths from the parts; the only way to build a bar.
    pub fn assemble(
        horizontal: Segment,
        start_hook: Option<Segment>,
        end_hook: Option<Segment>,
        class: BarClass,
    ) -> Self {
        let horizontal_length = horizontal.length();
        let hook_length = start_hook.map_or(0.0, |h| h.length())
            + end_hook.map_or(0.0, |h| h.length());
        Self {
            horizontal,
            start_hook,
            end_hook,
            horizontal_length,
            hook_length,
            total_length: horizontal_length + hook_length,
            class,
        }
    }
}

/// Reconstructs classified bars from canonical horizontal and vertical
/// segments, then merges collinear same-class runs.
///
/// `center_y` is the beam midline from [`crate::beam::center_height`]; a bar
/// strictly above it is top steel, anything at or below is bottom steel.
pub fn reconstruct_bars(
    horizontals: &[Segment],
    verticals: &[Segment],
    center_y: f32,
    options: &BarOptions,
) -> Vec<RebarBar> {
    let mut bars = Vec::new();
    for h in horizontals {
        let horizontal_length = h.length();
        if horizontal_length <= options.min_horizontal_length {
            continue;
        }

        let (start_candidates, end_candidates) = hook_candidates(h, verticals, options);
        let start_hook = closest_hook(&start_candidates);
        let end_hook = closest_hook(&end_candidates);

        let hook_length = start_hook.map_or(0.0, |s| s.length())
            + end_hook.map_or(0.0, |s| s.length());
        if hook_length > horizontal_length * options.max_hook_ratio {
            debug!(
                "reconstruct_bars: rejecting bar at y={:.1}, hook length {:.1} dwarfs run {:.1}",
                h.p0.y, hook_length, horizontal_length
            );
            continue;
        }
        if horizontal_length + hook_length <= options.min_total_length {
            continue;
        }

        let class = classify(h, center_y);
        bars.push(RebarBar::assemble(*h, start_hook, end_hook, class));
    }
    debug!("reconstruct_bars: {} bar(s) before collinear merge", bars.len());
    merge_collinear_bars(bars, options)
}

/// Top steel lies strictly above the beam midline; y on the midline counts
/// as bottom steel.
fn classify(horizontal: &Segment, center_y: f32) -> BarClass {
    if horizontal.p0.y < center_y {
        BarClass::TopSteel
    } else {
        BarClass::BottomSteel
    }
}

/// Vertical segments touching near the bar's endpoints, split into start-side
/// and end-side candidates. Both gates are required: x proximity of an
/// endpoint, and an endpoint-to-endpoint distance within tolerance — which
/// distinguishes "touches near this end" from "touches anywhere nearby".
fn hook_candidates(
    horizontal: &Segment,
    verticals: &[Segment],
    options: &BarOptions,
) -> (Vec<Segment>, Vec<Segment>) {
    let tol = options.endpoint_tolerance;
    let dist_tol = options.hook_distance_tolerance;
    let (hx0, hx1) = (horizontal.p0.x, horizontal.p1.x);

    let mut start = Vec::new();
    let mut end = Vec::new();
    for v in verticals {
        let near_x = (hx0 - v.p0.x).abs() <= tol
            || (hx1 - v.p0.x).abs() <= tol
            || (hx0 - v.p1.x).abs() <= tol
            || (hx1 - v.p1.x).abs() <= tol;
        if !near_x {
            continue;
        }
        if nalgebra::distance(&horizontal.p0, &v.p0) <= dist_tol
            || nalgebra::distance(&horizontal.p0, &v.p1) <= dist_tol
        {
            start.push(*v);
        }
        if nalgebra::distance(&horizontal.p1, &v.p0) <= dist_tol
            || nalgebra::distance(&horizontal.p1, &v.p1) <= dist_tol
        {
            end.push(*v);
        }
    }
    (start, end)
}

/// A bar takes at most one hook per end: the candidate with the lowest first
/// endpoint y, i.e. the one nearest the bar.
fn closest_hook(candidates: &[Segment]) -> Option<Segment> {
    candidates
        .iter()
        .min_by(|a, b| {
            a.p0.y
                .partial_cmp(&b.p0.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .copied()
}

/// Merges pairs of same-class bars whose horizontal extents nearly touch.
///
/// Pairwise and single-pass: bars are processed in input order, consumed
/// indices are marked so no bar merges twice. Hooks of a merged pair are
/// re-derived as closest-of-union and lengths recomputed.
pub fn merge_collinear_bars(bars: Vec<RebarBar>, options: &BarOptions) -> Vec<RebarBar> {
    let mut merged: Vec<RebarBar> = Vec::new();
    let mut used = vec![false; bars.len()];

    for i in 0..bars.len() {
        if used[i] {
            continue;
        }
        let mut partner = None;
        for (j, other) in bars.iter().enumerate() {
            if i != j && !used[j] && can_merge(&bars[i], other, options) {
                partner = Some(j);
                break;
            }
        }
        match partner {
            Some(j) => {
                merged.push(merge_pair(&bars[i], &bars[j]));
                used[i] = true;
                used[j] = true;
            }
            None => {
                merged.push(bars[i].clone());
                used[i] = true;
            }
        }
    }
    merged
}

fn can_merge(a: &RebarBar, b: &RebarBar, options: &BarOptions) -> bool {
    if a.class != b.class {
        return false;
    }
    let (ha, hb) = (&a.horizontal, &b.horizontal);
    let y_distance = (ha.p0.y - hb.p0.y).abs();
    let x_gap = (ha.p0.x - hb.p1.x).abs().min((hb.p0.x - ha.p1.x).abs());
    y_distance < options.merge_y_tolerance && x_gap < options.merge_x_gap
}

fn merge_pair(a: &RebarBar, b: &RebarBar) -> RebarBar {
    let horizontal = Segment::from_coords(
        a.horizontal.p0.x.min(b.horizontal.p0.x),
        a.horizontal.p0.y,
        a.horizontal.p1.x.max(b.horizontal.p1.x),
        a.horizontal.p1.y,
    );
    let start_pool: Vec<Segment> = [a.start_hook, b.start_hook].into_iter().flatten().collect();
    let end_pool: Vec<Segment> = [a.end_hook, b.end_hook].into_iter().flatten().collect();
    RebarBar::assemble(
        horizontal,
        closest_hook(&start_pool),
        closest_hook(&end_pool),
        a.class,
    )
}
