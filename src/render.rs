//! Raster I/O and diagnostic annotation.
//!
//! - `load_grayscale_image` / `load_rgb_image`: read a PNG/JPEG/etc. region
//!   raster; unreadable or empty files surface as [`TakeoffError::Input`].
//! - `annotate_bars` / `annotate_ties`: draw reconstructed entities onto a
//!   copy of the region image. Incidental output for inspection; the
//!   structured analyses are the contract.
//! - `write_json_file`: pretty-print a serializable report to disk.

use crate::beam::{BarClass, RebarBar};
use crate::column::{TieLabel, TieLayer};
use crate::errors::TakeoffError;
use crate::segments::Segment;
use image::{GrayImage, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

const TOP_STEEL: Rgb<u8> = Rgb([220, 40, 40]);
const BOTTOM_STEEL: Rgb<u8> = Rgb([40, 90, 220]);
const OUTER_TIE: Rgb<u8> = Rgb([220, 40, 40]);
const INNER_TIE: Rgb<u8> = Rgb([40, 200, 40]);

/// Load an image from disk as 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImage, TakeoffError> {
    let img = image::open(path)
        .map_err(|e| TakeoffError::Input {
            context: format!("{}: {e}", path.display()),
        })?
        .into_luma8();
    if img.width() == 0 || img.height() == 0 {
        return Err(TakeoffError::Input {
            context: format!("{} is empty", path.display()),
        });
    }
    Ok(img)
}

/// Load an image from disk as 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage, TakeoffError> {
    let img = image::open(path)
        .map_err(|e| TakeoffError::Input {
            context: format!("{}: {e}", path.display()),
        })?
        .into_rgb8();
    if img.width() == 0 || img.height() == 0 {
        return Err(TakeoffError::Input {
            context: format!("{} is empty", path.display()),
        });
    }
    Ok(img)
}

/// Draws each bar (run plus hooks) onto a copy of the region image, top
/// steel in red and bottom steel in blue.
pub fn annotate_bars(base: &RgbImage, bars: &[RebarBar]) -> RgbImage {
    let mut out = base.clone();
    for bar in bars {
        let color = match bar.class {
            BarClass::TopSteel => TOP_STEEL,
            BarClass::BottomSteel => BOTTOM_STEEL,
        };
        draw_segment(&mut out, &bar.horizontal, color);
        if let Some(hook) = bar.start_hook {
            draw_segment(&mut out, &hook, color);
        }
        if let Some(hook) = bar.end_hook {
            draw_segment(&mut out, &hook, color);
        }
    }
    out
}

/// Draws tie layers onto a copy of the region image, the outer (`C`-labeled)
/// course in red and inner courses in green.
pub fn annotate_ties(base: &RgbImage, layers: &[TieLayer]) -> RgbImage {
    let mut out = base.clone();
    for layer in layers {
        let color = match layer.label {
            TieLabel::C => OUTER_TIE,
            TieLabel::B => INNER_TIE,
        };
        for seg in &layer.segments {
            draw_segment(&mut out, seg, color);
        }
    }
    out
}

/// Save an RGB buffer to disk, creating parent directories.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

/// Linear interpolation between the endpoints with a 3px stamp; enough for
/// the axis-aligned strokes this pipeline produces.
fn draw_segment(image: &mut RgbImage, seg: &Segment, color: Rgb<u8>) {
    let dx = seg.p1.x - seg.p0.x;
    let dy = seg.p1.y - seg.p0.y;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = seg.p0.x + t * dx;
        let y = seg.p0.y + t * dy;
        stamp(image, x, y, color);
    }
}

fn stamp(image: &mut RgbImage, x: f32, y: f32, color: Rgb<u8>) {
    for oy in -1i32..=1 {
        for ox in -1i32..=1 {
            let px = x as i32 + ox;
            let py = y as i32 + oy;
            if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}
