//! Parsing of free-text dimension strings into decimal inches.
//!
//! Grammar (case-insensitive, whitespace-normalized, underscores read as
//! hyphens): a number with a feet unit (`'`, `ft`, `feet`) contributes
//! value x 12; a number with an inches unit (`"`, `in`, `inches`) contributes
//! the value directly and may be a mixed number (`6 1/2"`); a feet component
//! may carry a trailing inches component (`2'-6"`). Every matched component
//! in the string is summed. A string with no matching component parses to
//! zero.

use crate::errors::TakeoffError;
use once_cell::sync::Lazy;
use regex::Regex;

static MEASUREMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        (?P<feet>\d+(?:\.\d+)?)\s*(?:'|feet\b|ft\b)
        (?:\s*-?\s*
            (?P<tail_whole>\d+(?:\.\d+)?)
            (?:\s+(?P<tail_num>\d+)\s*/\s*(?P<tail_den>\d+))?
            \s*(?:"|inches\b|in\b)
        )?
        |
        (?P<whole>\d+(?:\.\d+)?)
        (?:\s+(?P<num>\d+)\s*/\s*(?P<den>\d+))?
        \s*(?:"|inches\b|in\b)
        "#,
    )
    .expect("static measurement regex")
});

/// Parses a dimension string, summing every feet/inches component found.
/// Returns 0.0 when nothing matches (e.g. a bare number with no unit).
pub fn parse_measurement(text: &str) -> f32 {
    let normalized = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('_', "-");

    let mut total_inches = 0.0f32;
    for caps in MEASUREMENT_RE.captures_iter(&normalized) {
        if let Some(feet) = caps.name("feet") {
            total_inches += parse_f32(feet.as_str()) * 12.0;
            if let Some(whole) = caps.name("tail_whole") {
                total_inches += parse_f32(whole.as_str());
                total_inches += fraction(caps.name("tail_num"), caps.name("tail_den"));
            }
        } else if let Some(whole) = caps.name("whole") {
            total_inches += parse_f32(whole.as_str());
            total_inches += fraction(caps.name("num"), caps.name("den"));
        }
    }
    total_inches
}

/// Like [`parse_measurement`] but surfaces an empty parse as an error instead
/// of silently yielding zero.
pub fn parse_measurement_checked(text: &str) -> Result<f32, TakeoffError> {
    let inches = parse_measurement(text);
    if inches > 0.0 {
        Ok(inches)
    } else {
        Err(TakeoffError::NoMeasurementFound {
            text: text.to_string(),
        })
    }
}

fn parse_f32(text: &str) -> f32 {
    text.parse().unwrap_or(0.0)
}

fn fraction(num: Option<regex::Match<'_>>, den: Option<regex::Match<'_>>) -> f32 {
    match (num, den) {
        (Some(num), Some(den)) => {
            let den = parse_f32(den.as_str());
            if den > 0.0 {
                parse_f32(num.as_str()) / den
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
