//! Normalized face-mesh landmarks and the two eye corners the overlay uses.
//!
//! Indices follow the 468-point face mesh topology; they are properties of
//! the detector, not tunables.

/// Number of points produced by the face mesh model.
pub const FACE_MESH_POINTS: usize = 468;

/// Outer corner of the subject's right eye (left side of the image).
pub const LEFT_EYE_OUTER: usize = 33;

/// Outer corner of the subject's left eye (right side of the image).
pub const RIGHT_EYE_OUTER: usize = 263;

/// An ordered set of landmarks for one face, each `(x, y)` in `[0, 1]`
/// relative to image width and height.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: Vec<(f64, f64)>,
}

/// Eye corners resolved to integer pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyePoints {
    pub left: (i64, i64),
    pub right: (i64, i64),
}

impl LandmarkSet {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Normalized outer eye corners, or `None` if the set is too short.
    pub fn eye_corners(&self) -> Option<((f64, f64), (f64, f64))> {
        let left = *self.points.get(LEFT_EYE_OUTER)?;
        let right = *self.points.get(RIGHT_EYE_OUTER)?;
        Some((left, right))
    }

    /// Eye corners in pixels: `normalized * dimension`, truncated toward zero.
    pub fn eye_pixels(&self, width: u32, height: u32) -> Option<EyePoints> {
        let (left, right) = self.eye_corners()?;
        let to_px = |(x, y): (f64, f64)| {
            (
                (x * width as f64) as i64,
                (y * height as f64) as i64,
            )
        };
        Some(EyePoints {
            left: to_px(left),
            right: to_px(right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with_eyes(left: (f64, f64), right: (f64, f64)) -> LandmarkSet {
        let mut points = vec![(0.5, 0.5); FACE_MESH_POINTS];
        points[LEFT_EYE_OUTER] = left;
        points[RIGHT_EYE_OUTER] = right;
        LandmarkSet::new(points)
    }

    #[test]
    fn test_eye_corners_reads_fixed_indices() {
        let set = mesh_with_eyes((0.25, 0.4), (0.75, 0.41));
        assert_eq!(set.eye_corners(), Some(((0.25, 0.4), (0.75, 0.41))));
    }

    #[test]
    fn test_eye_corners_short_set_is_none() {
        let set = LandmarkSet::new(vec![(0.1, 0.1); 100]);
        assert_eq!(set.eye_corners(), None);
        assert_eq!(set.eye_pixels(640, 480), None);
    }

    #[test]
    fn test_eye_pixels_scale_by_dimensions() {
        let set = mesh_with_eyes((0.25, 0.5), (0.75, 0.5));
        let eyes = set.eye_pixels(200, 100).unwrap();
        assert_eq!(eyes.left, (50, 50));
        assert_eq!(eyes.right, (150, 50));
    }

    #[test]
    fn test_eye_pixels_truncate_toward_zero() {
        // 0.3333 * 100 = 33.33 -> 33; 0.999 * 100 = 99.9 -> 99
        let set = mesh_with_eyes((0.3333, 0.999), (0.6667, 0.999));
        let eyes = set.eye_pixels(100, 100).unwrap();
        assert_eq!(eyes.left, (33, 99));
        assert_eq!(eyes.right, (66, 99));
    }

    #[test]
    fn test_len_and_empty() {
        assert!(LandmarkSet::new(Vec::new()).is_empty());
        assert_eq!(mesh_with_eyes((0.0, 0.0), (1.0, 1.0)).len(), FACE_MESH_POINTS);
    }
}
