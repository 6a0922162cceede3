//! Conversion of normalized regions into pixel boxes.

use crate::types::{PixelBox, Region};

/// Padding (pixels) added on every side of an ignore box to absorb
/// anti-aliasing fringes at region edges.
pub const EDGE_PAD_PX: u32 = 2;

/// Convert a sanitized region into a pixel box for a `width` x `height` mask.
///
/// The near edges are floored and the far edges ceiled, then `pad` pixels are
/// added on each side and the result is clamped to the mask. Returns `None`
/// when the box is empty.
pub fn to_pixel_box(region: &Region, width: u32, height: u32, pad: u32) -> Option<PixelBox> {
    let (w, h) = (width as f64, height as f64);
    let pad = pad as i64;

    let x0 = ((region.x * w).floor() as i64 - pad).max(0);
    let y0 = ((region.y * h).floor() as i64 - pad).max(0);
    let x1 = (((region.x + region.w) * w).ceil() as i64 + pad).min(width as i64);
    let y1 = (((region.y + region.h) * h).ceil() as i64 + pad).min(height as i64);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(PixelBox {
        x0: x0 as u32,
        y0: y0 as u32,
        x1: x1 as u32,
        y1: y1 as u32,
    })
}
