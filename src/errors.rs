//! Error taxonomy shared by the takeoff pipeline.
//!
//! Absence of detected lines is deliberately *not* an error: the detector
//! returning nothing degrades to an empty analysis with its `lines_found`
//! flag cleared, so downstream stages never crash on a blank region.

/// Hard failures surfaced to the caller with the specific kind attached.
#[derive(Clone, Debug, PartialEq)]
pub enum TakeoffError {
    /// Unreadable or empty image/mask input.
    Input { context: String },
    /// No horizontal segment qualified as a beam reference edge.
    NoReferenceLine { minimum_length: f32 },
    /// Calibration attempted against a degenerate reference feature.
    Calibration { pixel_length: f32 },
    /// A dimension string parsed to nothing.
    NoMeasurementFound { text: String },
    /// Unsupported color or region-type argument.
    Validation { message: String },
}

impl std::fmt::Display for TakeoffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TakeoffError::Input { context } => {
                write!(f, "unreadable or empty input ({context})")
            }
            TakeoffError::NoReferenceLine { minimum_length } => write!(
                f,
                "no horizontal reference line of length >= {minimum_length:.0}px found"
            ),
            TakeoffError::Calibration { pixel_length } => write!(
                f,
                "cannot calibrate against a reference of {pixel_length:.1}px"
            ),
            TakeoffError::NoMeasurementFound { text } => {
                write!(f, "no measurement found in {text:?}")
            }
            TakeoffError::Validation { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for TakeoffError {}
