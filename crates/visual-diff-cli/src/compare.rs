//! The `compare` command: decode, diff, render, write.

use std::path::{Path, PathBuf};

use visual_diff::{compute_diff, render_overlay_with, OverlayStyle, Region};

use crate::error::CliResult;
use crate::input::load_image;
use crate::report::{ComparisonReport, ReportOutputs};

/// Everything needed for one comparison run.
#[derive(Debug, Clone)]
pub struct CompareRequest {
    /// Before image: a path or a data URI.
    pub before: String,
    /// After image: a path or a data URI.
    pub after: String,
    pub threshold: u8,
    pub ignore_regions: Vec<Region>,
    pub style: OverlayStyle,
    pub out: PathBuf,
    pub mask_out: Option<PathBuf>,
}

/// Run one comparison and write its artifacts.
pub fn run_compare(req: &CompareRequest) -> CliResult<ComparisonReport> {
    let before = load_image(&req.before)?;
    let after = load_image(&req.after)?;

    let diff = compute_diff(&before, &after, req.threshold, &req.ignore_regions)?;
    let overlay = render_overlay_with(&before, &diff.mask, &req.style)?;

    ensure_parent(&req.out)?;
    overlay.save(&req.out)?;
    tracing::info!("Wrote overlay to {}", req.out.display());

    let mask_path = match &req.mask_out {
        Some(path) => {
            ensure_parent(path)?;
            diff.mask.to_luma_image().save(path)?;
            tracing::info!("Wrote mask to {}", path.display());
            Some(path.display().to_string())
        }
        None => None,
    };

    let report = ComparisonReport::new(
        &diff,
        req.threshold,
        req.ignore_regions.clone(),
        ReportOutputs {
            diff: req.out.display().to_string(),
            mask: mask_path,
        },
    );
    tracing::info!(
        "Comparison {}: {}% changed ({} of {} pixels)",
        report.id,
        report.diff_percentage,
        report.changed_pixels,
        report.total_pixels
    );
    Ok(report)
}

fn ensure_parent(path: &Path) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
