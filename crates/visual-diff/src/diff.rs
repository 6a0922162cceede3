//! Change detection between a before and an after image.

use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbImage};

use crate::align::align_to;
use crate::geometry::{to_pixel_box, EDGE_PAD_PX};
use crate::mask::ChangeMask;
use crate::region::sanitize_regions;
use crate::types::{DiffError, DiffResult, Region, VisualDiff};

/// Default per-pixel difference threshold (0-255).
pub const DEFAULT_THRESHOLD: u8 = 30;

/// Check that a caller-supplied threshold fits in 0..=255.
pub fn validate_threshold(threshold: i64) -> DiffResult<u8> {
    u8::try_from(threshold).map_err(|_| DiffError::InvalidThreshold(threshold))
}

/// Compute the change mask and change percentage between two images.
///
/// `after` is resampled to `before`'s size when they differ. A pixel is
/// changed when its largest per-channel RGB difference is strictly greater
/// than `threshold`. Cells inside any ignore region are then cleared.
pub fn compute_diff(
    before: &DynamicImage,
    after: &DynamicImage,
    threshold: u8,
    regions: &[Region],
) -> DiffResult<VisualDiff> {
    ensure_not_degenerate(before)?;
    ensure_not_degenerate(after)?;

    let (width, height) = before.dimensions();
    let after = align_to(before, after);

    let rgb_before = before.to_rgb8();
    let rgb_after = after.to_rgb8();
    let magnitude = channel_max_diff(&rgb_before, &rgb_after);

    let mut mask = ChangeMask::from_fn(width, height, |x, y| {
        magnitude.get_pixel(x, y).0[0] > threshold
    });
    let changed_before_ignore = mask.count_changed();

    let safe = sanitize_regions(regions);
    apply_ignore_regions(&mut mask, &safe, EDGE_PAD_PX);

    let diff_percentage = round4(mask.changed_ratio() * 100.0);

    tracing::debug!(
        "Diff {width}x{height} threshold={threshold}: {} changed ({} before {} ignore region(s)), {diff_percentage}%",
        mask.count_changed(),
        changed_before_ignore,
        safe.len()
    );

    Ok(VisualDiff {
        mask,
        diff_percentage,
        width,
        height,
    })
}

/// Per-pixel maximum absolute channel difference between two RGB images.
///
/// # Panics
///
/// Panics if the images differ in size; callers align them first.
pub fn channel_max_diff(a: &RgbImage, b: &RgbImage) -> GrayImage {
    assert_eq!(
        a.dimensions(),
        b.dimensions(),
        "images must be aligned before diffing"
    );

    let (w, h) = a.dimensions();
    let mut diff_img = GrayImage::new(w, h);
    for (x, y, pa) in a.enumerate_pixels() {
        let pb = b.get_pixel(x, y);
        let d = pa
            .0
            .iter()
            .zip(pb.0.iter())
            .map(|(&ca, &cb)| (ca as i16 - cb as i16).unsigned_abs() as u8)
            .max()
            .unwrap_or(0);
        diff_img.put_pixel(x, y, Luma([d]));
    }
    diff_img
}

/// Clear every mask cell covered by a (sanitized) region, padded by `pad` pixels.
pub fn apply_ignore_regions(mask: &mut ChangeMask, regions: &[Region], pad: u32) {
    let (w, h) = mask.dimensions();
    for region in regions {
        if let Some(bx) = to_pixel_box(region, w, h, pad) {
            mask.clear_box(&bx);
        }
    }
}

fn ensure_not_degenerate(img: &DynamicImage) -> DiffResult<()> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DiffError::DegenerateImage { width, height });
    }
    Ok(())
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn solid(w: u32, h: u32, c: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(c)))
    }

    /// 10x10 black image with its left `cols` columns painted white.
    fn left_columns_white(cols: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(10, 10, |x, _| {
            if x < cols {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }))
    }

    #[test]
    fn test_identical_images() {
        let img = solid(100, 100, [12, 200, 7]);
        for t in [0u8, 1, 30, 254, 255] {
            let diff = compute_diff(&img, &img, t, &[]).unwrap();
            assert_eq!(diff.diff_percentage, 0.0);
            assert_eq!(diff.changed_pixels(), 0);
        }
    }

    #[test]
    fn test_uniform_shift_above_threshold() {
        let before = solid(10, 10, [0, 0, 0]);
        let after = solid(10, 10, [50, 50, 50]);
        let diff = compute_diff(&before, &after, 30, &[]).unwrap();
        assert_eq!(diff.diff_percentage, 100.0);
        assert_eq!(diff.changed_pixels(), 100);
        assert_eq!((diff.width, diff.height), (10, 10));
    }

    #[test]
    fn test_uniform_shift_below_threshold() {
        let before = solid(10, 10, [0, 0, 0]);
        let after = solid(10, 10, [50, 50, 50]);
        let diff = compute_diff(&before, &after, 60, &[]).unwrap();
        assert_eq!(diff.diff_percentage, 0.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let before = solid(4, 4, [0, 0, 0]);
        let after = solid(4, 4, [50, 50, 50]);
        assert_eq!(compute_diff(&before, &after, 50, &[]).unwrap().diff_percentage, 0.0);
        assert_eq!(compute_diff(&before, &after, 49, &[]).unwrap().diff_percentage, 100.0);
    }

    #[test]
    fn test_threshold_extremes() {
        let before = solid(4, 4, [0, 0, 0]);
        let nudged = solid(4, 4, [0, 1, 0]);
        assert_eq!(compute_diff(&before, &nudged, 0, &[]).unwrap().diff_percentage, 100.0);

        let inverted = solid(4, 4, [255, 255, 255]);
        assert_eq!(compute_diff(&before, &inverted, 255, &[]).unwrap().diff_percentage, 0.0);
    }

    #[test]
    fn test_single_channel_shift_detected() {
        let before = solid(8, 8, [100, 100, 100]);
        let after = solid(8, 8, [100, 100, 140]);
        let diff = compute_diff(&before, &after, 30, &[]).unwrap();
        assert_eq!(diff.diff_percentage, 100.0);
    }

    #[test]
    fn test_full_ignore_region_masks_everything() {
        let before = solid(10, 10, [0, 0, 0]);
        let after = solid(10, 10, [50, 50, 50]);
        let diff = compute_diff(&before, &after, 30, &[Region::full()]).unwrap();
        assert_eq!(diff.diff_percentage, 0.0);
    }

    #[test]
    fn test_ignore_region_with_padding() {
        let before = solid(100, 100, [0, 0, 0]);
        let after = solid(100, 100, [255, 0, 0]);
        let region = Region::new(0.2, 0.2, 0.2, 0.2);
        let diff = compute_diff(&before, &after, 30, &[region]).unwrap();
        // 20..40 padded to 18..42 -> 24x24 cleared
        assert_eq!(diff.changed_pixels(), 10_000 - 24 * 24);
        assert!(!diff.mask.get(18, 18));
        assert!(diff.mask.get(17, 18));
        assert!(!diff.mask.get(41, 41));
        assert!(diff.mask.get(42, 41));
    }

    #[test]
    fn test_degenerate_region_masks_nothing() {
        let before = solid(10, 10, [0, 0, 0]);
        let after = solid(10, 10, [50, 50, 50]);
        let regions = [Region::new(0.2, 0.2, 0.0, 0.5), Region::new(0.2, 0.2, 0.5, -1.0)];
        let diff = compute_diff(&before, &after, 30, &regions).unwrap();
        assert_eq!(diff.diff_percentage, 100.0);
    }

    #[test]
    fn test_malformed_region_is_clipped_not_rejected() {
        let before = solid(10, 10, [0, 0, 0]);
        let after = solid(10, 10, [50, 50, 50]);
        // clips to x 0.9..1.0, padded to columns 7..10
        let diff = compute_diff(&before, &after, 30, &[Region::new(0.9, 0.0, 0.5, 1.0)]).unwrap();
        assert_eq!(diff.changed_pixels(), 70);
        assert_eq!(diff.diff_percentage, 70.0);
    }

    #[test]
    fn test_threshold_monotonic() {
        let before = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, 0])
        }));
        let after = solid(16, 16, [128, 128, 128]);
        let mut last = f64::MAX;
        for t in (0..=255u16).step_by(5) {
            let pct = compute_diff(&before, &after, t as u8, &[]).unwrap().diff_percentage;
            assert!(pct <= last, "threshold {t} increased diff: {pct} > {last}");
            last = pct;
        }
    }

    #[test]
    fn test_adding_regions_never_increases_diff() {
        let before = left_columns_white(6);
        let after = solid(10, 10, [0, 0, 0]);
        let candidates = [
            Region::new(0.0, 0.0, 0.1, 0.1),
            Region::new(0.5, 0.5, 0.5, 0.5),
            Region::new(0.3, 0.0, 0.2, 1.0),
            Region::new(2.0, 2.0, 1.0, 1.0),
        ];
        let mut regions = Vec::new();
        let mut last = compute_diff(&before, &after, 30, &regions).unwrap().diff_percentage;
        assert_eq!(last, 60.0);
        for r in candidates {
            regions.push(r);
            let pct = compute_diff(&before, &after, 30, &regions).unwrap().diff_percentage;
            assert!(pct <= last);
            last = pct;
        }
    }

    #[test]
    fn test_size_mismatch_resamples_after() {
        let before = solid(100, 50, [10, 10, 10]);
        let after = solid(200, 100, [10, 10, 10]);
        let diff = compute_diff(&before, &after, 30, &[]).unwrap();
        assert_eq!((diff.width, diff.height), (100, 50));
        assert_eq!(diff.mask.dimensions(), (100, 50));
        assert_eq!(diff.total_pixels(), 5000);
        assert_eq!(diff.diff_percentage, 0.0);
    }

    #[test]
    fn test_alpha_is_discarded() {
        let before = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 5, Rgba([40, 80, 120, 0])));
        let after = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 5, Rgba([40, 80, 120, 255])));
        let diff = compute_diff(&before, &after, 0, &[]).unwrap();
        assert_eq!(diff.diff_percentage, 0.0);
    }

    #[test]
    fn test_percentage_rounded_to_four_places() {
        // 1 changed pixel out of 3 * 7 = 21 -> 4.761904...
        let before = solid(3, 7, [0, 0, 0]);
        let after = DynamicImage::ImageRgb8(RgbImage::from_fn(3, 7, |x, y| {
            if x == 0 && y == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }));
        let diff = compute_diff(&before, &after, 30, &[]).unwrap();
        assert_eq!(diff.diff_percentage, 4.7619);
    }

    #[test]
    fn test_degenerate_images_rejected() {
        let empty = DynamicImage::new_rgb8(0, 10);
        let ok = solid(10, 10, [0, 0, 0]);
        assert_eq!(
            compute_diff(&empty, &ok, 30, &[]).unwrap_err(),
            DiffError::DegenerateImage { width: 0, height: 10 }
        );
        assert!(matches!(
            compute_diff(&ok, &DynamicImage::new_rgb8(10, 0), 30, &[]),
            Err(DiffError::DegenerateImage { .. })
        ));
    }

    #[test]
    fn test_validate_threshold() {
        assert_eq!(validate_threshold(0), Ok(0));
        assert_eq!(validate_threshold(255), Ok(255));
        assert_eq!(validate_threshold(256), Err(DiffError::InvalidThreshold(256)));
        assert_eq!(validate_threshold(-1), Err(DiffError::InvalidThreshold(-1)));
    }

    #[test]
    fn test_channel_max_diff_values() {
        let a = RgbImage::from_pixel(1, 1, Rgb([10, 200, 50]));
        let b = RgbImage::from_pixel(1, 1, Rgb([30, 150, 50]));
        assert_eq!(channel_max_diff(&a, &b).get_pixel(0, 0).0, [50]);
        assert_eq!(channel_max_diff(&b, &a).get_pixel(0, 0).0, [50]);
    }

    #[test]
    #[should_panic(expected = "aligned")]
    fn test_channel_max_diff_rejects_unaligned() {
        channel_max_diff(&RgbImage::new(2, 2), &RgbImage::new(3, 2));
    }
}
