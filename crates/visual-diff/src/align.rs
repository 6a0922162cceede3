//! Size alignment of the after-image to the before-image.

use std::borrow::Cow;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Return `after` resampled to `before`'s dimensions.
///
/// The before-image is the fixed reference frame and is never resized. When
/// the sizes already match, `after` is borrowed as-is.
pub fn align_to<'a>(before: &DynamicImage, after: &'a DynamicImage) -> Cow<'a, DynamicImage> {
    let (target_w, target_h) = before.dimensions();
    let (w, h) = after.dimensions();

    if (w, h) == (target_w, target_h) {
        return Cow::Borrowed(after);
    }

    tracing::info!("Resampling after image from {w}x{h} to {target_w}x{target_h}");
    Cow::Owned(after.resize_exact(target_w, target_h, FilterType::Triangle))
}
