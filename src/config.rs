//! JSON configuration loading for the pipeline parameters.

use crate::pipeline::TakeoffParams;
use std::fs;
use std::path::Path;

pub fn load_params(path: &Path) -> Result<TakeoffParams, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
