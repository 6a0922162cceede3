//! Core data types for visual comparisons.

use serde::{Deserialize, Serialize};

use crate::mask::ChangeMask;

/// A normalized ignore region. `(x, y)` is the top-left corner; every field is
/// a fraction of the image width or height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The region covering the whole image.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// A half-open pixel rectangle `[x0, x1) x [y0, y1)` in mask coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Outcome of one before/after comparison.
#[derive(Debug, Clone)]
pub struct VisualDiff {
    pub mask: ChangeMask,
    /// Changed pixels as a percentage of the before-image area, 4 decimal places.
    pub diff_percentage: f64,
    pub width: u32,
    pub height: u32,
}

impl VisualDiff {
    pub fn changed_pixels(&self) -> u64 {
        self.mask.count_changed()
    }

    pub fn total_pixels(&self) -> u64 {
        self.mask.total()
    }
}

/// Errors that can occur in the diff core.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("Invalid threshold: {0} (expected 0..=255)")]
    InvalidThreshold(i64),

    #[error("Degenerate image: {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    #[error("Mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskSizeMismatch {
        mask_width: u32,
        mask_height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// Convenience result type.
pub type DiffResult<T> = Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_json_shape() {
        let r: Region = serde_json::from_str(r#"{"x":0.1,"y":0.2,"w":0.3,"h":0.4}"#).unwrap();
        assert_eq!(r, Region::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn test_pixel_box_extent() {
        let b = PixelBox { x0: 2, y0: 3, x1: 6, y1: 5 };
        assert_eq!(b.width(), 4);
        assert_eq!(b.height(), 2);
        assert_eq!(b.area(), 8);
        assert!(b.contains(2, 3));
        assert!(!b.contains(6, 3));
        assert!(!b.is_empty());
    }

    #[test]
    fn test_inverted_box_is_empty() {
        let b = PixelBox { x0: 5, y0: 0, x1: 5, y1: 10 };
        assert!(b.is_empty());
        assert_eq!(b.area(), 0);
    }
}
