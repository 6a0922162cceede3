//! Rendering of the change mask as a highlight over the before-image.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::mask::ChangeMask;
use crate::types::{DiffError, DiffResult};

/// Highlight alpha used for changed pixels (about 47%).
pub const HIGHLIGHT_ALPHA: u8 = 120;

/// Highlight color used for changed pixels.
pub const HIGHLIGHT_COLOR: [u8; 3] = [255, 0, 0];

/// Color and opacity of the change highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayStyle {
    pub color: [u8; 3],
    pub alpha: u8,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: HIGHLIGHT_COLOR,
            alpha: HIGHLIGHT_ALPHA,
        }
    }
}

impl OverlayStyle {
    fn pixel(&self) -> Rgba<u8> {
        let [r, g, b] = self.color;
        Rgba([r, g, b, self.alpha])
    }
}

/// Composite the default red highlight over `before` at every changed pixel.
pub fn render_overlay(before: &DynamicImage, mask: &ChangeMask) -> DiffResult<RgbaImage> {
    render_overlay_with(before, mask, &OverlayStyle::default())
}

/// Composite `style`'s highlight over `before` at every changed pixel.
/// Unchanged pixels are copied from `before` exactly.
pub fn render_overlay_with(
    before: &DynamicImage,
    mask: &ChangeMask,
    style: &OverlayStyle,
) -> DiffResult<RgbaImage> {
    let (width, height) = before.dimensions();
    if width == 0 || height == 0 {
        return Err(DiffError::DegenerateImage { width, height });
    }
    if mask.dimensions() != (width, height) {
        return Err(DiffError::MaskSizeMismatch {
            mask_width: mask.width(),
            mask_height: mask.height(),
            image_width: width,
            image_height: height,
        });
    }

    // Fully transparent layer, highlight only where the mask is set.
    let transparent = Rgba([style.color[0], style.color[1], style.color[2], 0]);
    let highlight = style.pixel();
    let overlay = RgbaImage::from_fn(width, height, |x, y| {
        if mask.get(x, y) {
            highlight
        } else {
            transparent
        }
    });

    let mut out = before.to_rgba8();
    for (x, y, src) in overlay.enumerate_pixels() {
        if src[3] == 0 {
            continue;
        }
        let dst = out.get_pixel_mut(x, y);
        *dst = blend_over(*dst, *src);
    }

    tracing::debug!(
        "Rendered overlay {width}x{height}: {} highlighted pixel(s)",
        mask.count_changed()
    );
    Ok(out)
}

/// Porter-Duff "over": `src` composited onto `dst`, non-premultiplied.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let v = (src[i] as f64 * sa + dst[i] as f64 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}
