//! Parameter types configuring the takeoff stages.
//!
//! Defaults adopt the most permissive of the historically observed threshold
//! variants; every knob is configuration, not a hardcoded constant, and the
//! whole set loads from JSON via [`crate::config::load_params`].

use crate::beam::{BarOptions, CenterOptions};
use crate::column::TieOptions;
use crate::segments::{MergeOptions, DEFAULT_MAX_DEVIATION};
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters covering every stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeoffParams {
    /// Axis deviation (px) for the orientation classifier.
    pub orientation_max_deviation: f32,
    /// Proximity merging of same-orientation segments.
    pub merge: MergeOptions,
    /// Beam reference-edge selection.
    pub center: CenterOptions,
    /// Hook pairing, bar retention and collinear merging.
    pub bars: BarOptions,
    /// Column tie layer grouping.
    pub ties: TieOptions,
}

impl Default for TakeoffParams {
    fn default() -> Self {
        Self {
            orientation_max_deviation: DEFAULT_MAX_DEVIATION,
            merge: MergeOptions::default(),
            center: CenterOptions::default(),
            bars: BarOptions::default(),
            ties: TieOptions::default(),
        }
    }
}
