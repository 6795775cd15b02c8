use crate::beam::RebarBar;
use crate::column::TieMeasurement;
use serde::Serialize;

/// Structured result of analyzing one beam region.
///
/// `lines_found` is cleared when the detector returned nothing for the masked
/// region; the analysis is then empty but valid, never an error.
#[derive(Clone, Debug, Serialize)]
pub struct BeamAnalysis {
    pub lines_found: bool,
    /// Top/bottom discriminant derived from the unmasked beam image.
    pub center_y: f32,
    pub bars: Vec<RebarBar>,
}

/// Structured result of analyzing one column region.
#[derive(Clone, Debug, Serialize)]
pub struct ColumnAnalysis {
    pub lines_found: bool,
    pub ties: Vec<TieMeasurement>,
}
