#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod beam;
pub mod collaborators;
pub mod column;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod render;
pub mod scale;
pub mod segments;
pub mod types;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline stages + results.
pub use crate::errors::TakeoffError;
pub use crate::pipeline::{
    analyze_beam, analyze_beams, analyze_column, calibrate_scale_region, TakeoffParams,
};
pub use crate::types::{BeamAnalysis, ColumnAnalysis};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::beam::{reconstruct_bars, BarClass, BarOptions, RebarBar};
    pub use crate::collaborators::{LineDetector, TextRecognizer};
    pub use crate::column::{extract_tie_layers, TieLabel, TieMeasurement};
    pub use crate::scale::{parse_measurement, DrawingScale, ScaleCalibration};
    pub use crate::segments::{
        merge_segments, partition_by_orientation, Axis, MergeOptions, Orientation, Segment,
    };
    pub use crate::{
        analyze_beam, analyze_column, BeamAnalysis, ColumnAnalysis, TakeoffError, TakeoffParams,
    };
}
