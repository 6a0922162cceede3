//! Dense per-pixel change mask.

use image::{GrayImage, Luma};

use crate::types::PixelBox;

/// Row-major grid of "changed" flags. Dimensions are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl ChangeMask {
    /// Create a mask with every cell unchanged.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self { width, height, cells }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "mask index ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Whether the pixel at `(x, y)` is marked changed.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, changed: bool) {
        let i = self.index(x, y);
        self.cells[i] = changed;
    }

    /// Force every cell inside `bx` to unchanged. The box is clipped to the mask.
    pub fn clear_box(&mut self, bx: &PixelBox) {
        let x1 = bx.x1.min(self.width);
        let y1 = bx.y1.min(self.height);
        if x1 <= bx.x0 || y1 <= bx.y0 {
            return;
        }
        let stride = self.width as usize;
        for y in bx.y0..y1 {
            let row = y as usize * stride;
            self.cells[row + bx.x0 as usize..row + x1 as usize].fill(false);
        }
    }

    pub fn count_changed(&self) -> u64 {
        self.cells.iter().filter(|&&c| c).count() as u64
    }

    pub fn total(&self) -> u64 {
        self.cells.len() as u64
    }

    /// Fraction of changed cells in [0, 1]; 0 for an empty mask.
    pub fn changed_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count_changed() as f64 / total as f64
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    /// Render as a black/white image: changed cells are white.
    pub fn to_luma_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }
}
