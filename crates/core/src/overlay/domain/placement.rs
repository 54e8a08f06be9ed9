//! Where a sprite goes: centered on the eye midpoint, scaled so its width is
//! twice the inter-eye distance.
//!
//! Sprites are authored to span eye to eye plus the temples, so doubling the
//! corner-to-corner distance approximates the full frame width.

use crate::detection::domain::landmark_set::EyePoints;

/// Target sprite width as a multiple of the inter-eye distance.
pub const WIDTH_TO_EYE_SPAN: f64 = 2.0;

/// Target rectangle for a scaled sprite, in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PlacementRect {
    /// Whether the rectangle lies entirely inside a `width × height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + self.width as i64 <= width as i64
            && self.y + self.height as i64 <= height as i64
    }
}

/// Integer midpoint of the two eye corners, truncated toward zero.
pub fn eye_center(eyes: &EyePoints) -> (i64, i64) {
    (
        (eyes.left.0 + eyes.right.0) / 2,
        (eyes.left.1 + eyes.right.1) / 2,
    )
}

/// `2 × |right − left|`, rounded to the nearest pixel.
pub fn target_width(eyes: &EyePoints) -> u32 {
    let dx = (eyes.right.0 - eyes.left.0) as f64;
    let dy = (eyes.right.1 - eyes.left.1) as f64;
    (dx.hypot(dy) * WIDTH_TO_EYE_SPAN).round() as u32
}

/// Scaled sprite rectangle centered on the eye midpoint.
///
/// Width equals [`target_width`]; height keeps the sprite's aspect ratio.
/// Returns `None` when either scaled dimension collapses to zero, the
/// sprite itself is empty, or the scaled height does not fit in `u32`.
pub fn compute_placement(
    eyes: &EyePoints,
    sprite_width: u32,
    sprite_height: u32,
) -> Option<PlacementRect> {
    if sprite_width == 0 || sprite_height == 0 {
        return None;
    }
    let width = target_width(eyes);
    let height = u32::try_from(sprite_height as u64 * width as u64 / sprite_width as u64).ok()?;
    if width == 0 || height == 0 {
        return None;
    }

    let (cx, cy) = eye_center(eyes);
    Some(PlacementRect {
        x: cx - (width / 2) as i64,
        y: cy - (height / 2) as i64,
        width,
        height,
    })
}
