//! Normalization of caller-supplied ignore regions.

use crate::types::Region;

/// Clamp to [0, 1]. NaN maps to 0.
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

/// Clamp a single region into the unit square, clipping its far edges to the
/// image bound. Returns `None` when the region has no area.
pub fn sanitize_region(region: &Region) -> Option<Region> {
    let x = clamp_unit(region.x);
    let y = clamp_unit(region.y);
    let mut w = clamp_unit(region.w);
    let mut h = clamp_unit(region.h);

    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    if x + w > 1.0 {
        w = 1.0 - x;
    }
    if y + h > 1.0 {
        h = 1.0 - y;
    }
    // A region starting on the far edge clips to nothing.
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    Some(Region { x, y, w, h })
}

/// Sanitize a list of regions, silently dropping degenerate ones.
/// Surviving regions keep their input order.
pub fn sanitize_regions(regions: &[Region]) -> Vec<Region> {
    let safe: Vec<Region> = regions.iter().filter_map(sanitize_region).collect();
    if safe.len() < regions.len() {
        tracing::debug!(
            "Dropped {} degenerate ignore region(s)",
            regions.len() - safe.len()
        );
    }
    safe
}
