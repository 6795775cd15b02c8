//! Column tie (stirrup) layer extraction.
//!
//! Overview
//! - Horizontal canonical segments strictly above the reference midline are
//!   grouped into layers: rows whose mean y sits within a vertical threshold
//!   of the previous row's, provided their x extents overlap beyond a
//!   controlled negative tolerance (a small gap still joins). Each finished
//!   group collapses to one representative segment spanning the x union at
//!   the mean y, and the pass repeats until the row count stops shrinking.
//! - The topmost layer is labeled `C` when a second distinct layer exists
//!   beneath it and `B` otherwise; a second layer is always labeled `B`.
//!   This asymmetric rule is carried verbatim from the observed drawing
//!   convention (outer tie vs. single tie) — do not normalize it without
//!   confirming intent with the drawing authors.

use crate::scale::ScaleCalibration;
use crate::segments::Segment;
use log::debug;
use serde::{Deserialize, Serialize};

/// Layer grouping thresholds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TieOptions {
    /// Max mean-y difference (px) between rows of one layer.
    pub vertical_threshold: f32,
    /// Allowed x-extent gap (px): overlap must exceed minus this value.
    pub horizontal_threshold: f32,
    /// Band (px) around a layer's y that collects its member rows.
    pub layer_band: f32,
    /// Pass cap for the collapse loop; `None` bounds by input size.
    pub max_passes: Option<usize>,
}

impl Default for TieOptions {
    fn default() -> Self {
        Self {
            vertical_threshold: 5.0,
            horizontal_threshold: 20.0,
            layer_band: 5.0,
            max_passes: None,
        }
    }
}

/// Tie layer label. The meaning of `B` depends on whether a second layer is
/// present; see the module docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieLabel {
    B,
    C,
}

impl std::fmt::Display for TieLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieLabel::B => write!(f, "B"),
            TieLabel::C => write!(f, "C"),
        }
    }
}

/// An ordered course of ties sharing a y band.
#[derive(Clone, Debug, Serialize)]
pub struct TieLayer {
    pub label: TieLabel,
    pub segments: Vec<Segment>,
}

/// One labeled tie with its real-world length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TieMeasurement {
    pub label: TieLabel,
    pub length_in: f32,
}

/// Groups the segments above `center_y` into at most two labeled layers.
pub fn extract_tie_layers(
    horizontals: &[Segment],
    center_y: f32,
    options: &TieOptions,
) -> Vec<TieLayer> {
    let mut above: Vec<Segment> = horizontals
        .iter()
        .filter(|seg| seg.p0.y < center_y)
        .copied()
        .collect();
    if above.is_empty() {
        return Vec::new();
    }
    above.sort_by(|a, b| a.p0.y.partial_cmp(&b.p0.y).unwrap_or(std::cmp::Ordering::Equal));

    let rows = collapse_tie_rows(above, options);

    let topmost_y = rows[0].p0.y;
    let band = options.layer_band;
    let topmost: Vec<Segment> = rows
        .iter()
        .filter(|row| (row.p0.y - topmost_y).abs() < band)
        .copied()
        .collect();

    let second: Vec<Segment> = rows
        .iter()
        .find(|row| (row.p0.y - topmost_y).abs() >= band)
        .map(|row| row.p0.y)
        .map(|second_y| {
            rows.iter()
                .filter(|row| (row.p0.y - second_y).abs() < band)
                .copied()
                .collect()
        })
        .unwrap_or_default();

    debug!(
        "extract_tie_layers: {} row(s) in topmost layer, {} in second",
        topmost.len(),
        second.len()
    );

    let topmost_label = if second.is_empty() { TieLabel::B } else { TieLabel::C };
    let mut layers = vec![TieLayer {
        label: topmost_label,
        segments: topmost,
    }];
    if !second.is_empty() {
        layers.push(TieLayer {
            label: TieLabel::B,
            segments: second,
        });
    }
    layers
}

/// Collapses adjacent rows to a fixpoint, capped by the input size.
pub fn collapse_tie_rows(rows: Vec<Segment>, options: &TieOptions) -> Vec<Segment> {
    let cap = options.max_passes.unwrap_or_else(|| rows.len().max(1));
    let mut current = rows;
    for _ in 0..cap {
        let collapsed = collapse_pass(&current, options);
        let shrunk = collapsed.len() < current.len();
        current = collapsed;
        if !shrunk {
            break;
        }
    }
    current
}

fn collapse_pass(rows: &[Segment], options: &TieOptions) -> Vec<Segment> {
    if rows.is_empty() {
        return Vec::new();
    }
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        a.mean_y()
            .partial_cmp(&b.mean_y())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut collapsed = Vec::new();
    let mut group: Vec<Segment> = vec![sorted[0]];
    for row in &sorted[1..] {
        let prev = *group.last().expect("group never empty");
        let vertical_distance = (row.mean_y() - prev.mean_y()).abs();
        let overlap = prev.p1.x.min(row.p1.x) - prev.p0.x.max(row.p0.x);
        if vertical_distance < options.vertical_threshold
            && overlap > -options.horizontal_threshold
        {
            group.push(*row);
        } else {
            collapsed.push(collapse_group(&group));
            group = vec![*row];
        }
    }
    collapsed.push(collapse_group(&group));
    collapsed
}

/// One representative segment: x union at the mean of every endpoint y.
fn collapse_group(group: &[Segment]) -> Segment {
    let x_min = group.iter().map(|s| s.p0.x).fold(f32::MAX, f32::min);
    let x_max = group.iter().map(|s| s.p1.x).fold(f32::MIN, f32::max);
    let y_sum: f32 = group.iter().map(|s| s.p0.y + s.p1.y).sum();
    let y_avg = y_sum / (2.0 * group.len() as f32);
    Segment::from_coords(x_min, y_avg, x_max, y_avg)
}

/// Flattens layers into `(label, real length)` ordered by x position.
pub fn tie_measurements(
    layers: &[TieLayer],
    calibration: &ScaleCalibration,
) -> Vec<TieMeasurement> {
    let mut entries: Vec<(f32, TieLabel, f32)> = layers
        .iter()
        .flat_map(|layer| {
            layer
                .segments
                .iter()
                .map(|seg| (seg.p0.x, layer.label, seg.length()))
        })
        .collect();
    entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    entries
        .into_iter()
        .map(|(_, label, px)| TieMeasurement {
            label,
            length_in: calibration.to_inches(px),
        })
        .collect()
}
