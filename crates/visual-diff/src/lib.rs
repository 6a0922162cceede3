//! visual-diff: compares a before and an after image into a change mask, a
//! change percentage and a highlight overlay.

pub mod align;
pub mod diff;
pub mod geometry;
pub mod mask;
pub mod overlay;
pub mod region;
pub mod types;

pub use align::align_to;
pub use diff::{
    apply_ignore_regions, channel_max_diff, compute_diff, validate_threshold, DEFAULT_THRESHOLD,
};
pub use geometry::{to_pixel_box, EDGE_PAD_PX};
pub use mask::ChangeMask;
pub use overlay::{render_overlay, render_overlay_with, OverlayStyle, HIGHLIGHT_ALPHA, HIGHLIGHT_COLOR};
pub use region::{sanitize_region, sanitize_regions};
pub use types::*;
