//! Parsing of ignore regions supplied on the command line.

use std::path::Path;

use visual_diff::Region;

use crate::error::{CliError, CliResult};

/// Parse a JSON array of `{ "x", "y", "w", "h" }` objects.
///
/// Values are not range-checked here; the diff core sanitizes them.
pub fn parse_ignore_regions(json: &str) -> CliResult<Vec<Region>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).map_err(|e| CliError::InvalidRegions(e.to_string()))
}

/// Read and parse ignore regions from a JSON file.
pub fn load_ignore_regions(path: &Path) -> CliResult<Vec<Region>> {
    let raw = std::fs::read_to_string(path)?;
    parse_ignore_regions(&raw)
}
