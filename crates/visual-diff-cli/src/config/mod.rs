//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use visual_diff::{validate_threshold, OverlayStyle, DEFAULT_THRESHOLD};

use crate::error::{CliError, CliResult};

/// Env var overriding the default threshold.
pub const THRESHOLD_ENV: &str = "VISUAL_DIFF_THRESHOLD";

/// Env var overriding the default overlay output path.
pub const OUT_ENV: &str = "VISUAL_DIFF_OUT";

/// Resolve the diff threshold: explicit flag, then env var, then the default.
pub fn resolve_threshold(explicit: Option<i64>) -> CliResult<u8> {
    if let Some(t) = explicit {
        return Ok(validate_threshold(t)?);
    }

    if let Ok(raw) = std::env::var(THRESHOLD_ENV) {
        return parse_threshold(&raw);
    }

    Ok(DEFAULT_THRESHOLD)
}

/// Parse a threshold from text, e.g. an env value.
pub fn parse_threshold(raw: &str) -> CliResult<u8> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidThreshold(format!("not an integer: {raw:?}")))?;
    validate_threshold(value).map_err(|e| CliError::InvalidThreshold(e.to_string()))
}

/// Resolve where the overlay PNG is written.
pub fn resolve_output_path(explicit: Option<&str>, before: &str) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(OUT_ENV) {
        return PathBuf::from(env_path);
    }

    default_output_path(before)
}

/// `<before-stem>.diff.png` next to the before file, or in the working
/// directory when the before image is not a file path.
fn default_output_path(before: &str) -> PathBuf {
    if before.starts_with("data:") {
        return PathBuf::from("diff.png");
    }
    let path = Path::new(before);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("before");
    path.with_file_name(format!("{stem}.diff.png"))
}

/// Overlay style with an optional alpha override.
pub fn overlay_style(alpha: Option<u8>) -> OverlayStyle {
    let mut style = OverlayStyle::default();
    if let Some(a) = alpha {
        style.alpha = a;
    }
    style
}
