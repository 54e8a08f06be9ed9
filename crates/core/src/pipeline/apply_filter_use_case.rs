use crate::detection::domain::landmark_provider::LandmarkProvider;
use crate::overlay::domain::blend::blend;
use crate::overlay::domain::placement::compute_placement;
use crate::overlay::domain::sprite_source::SpriteSource;
use crate::shared::frame::Frame;

/// Eyewear overlay: load sprite → detect landmarks → place → blend.
///
/// Every failure along the way degrades to returning the input unchanged.
/// Only the first detected face is decorated.
pub struct ApplyFilterUseCase {
    provider: Box<dyn LandmarkProvider>,
    sprites: Box<dyn SpriteSource>,
}

impl ApplyFilterUseCase {
    pub fn new(provider: Box<dyn LandmarkProvider>, sprites: Box<dyn SpriteSource>) -> Self {
        Self { provider, sprites }
    }

    /// Returns an annotated copy of `frame`; the input is never modified.
    pub fn execute(&mut self, frame: &Frame, filter_id: &str) -> Frame {
        let Some(sprite) = self.sprites.load(filter_id) else {
            return frame.clone();
        };

        let faces = match self.provider.detect(frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("Landmark detection failed, returning input unchanged: {e}");
                return frame.clone();
            }
        };
        let Some(face) = faces.first() else {
            log::info!("No face detected");
            return frame.clone();
        };
        if faces.len() > 1 {
            log::debug!("{} faces detected, decorating the first", faces.len());
        }

        let Some(eyes) = face.eye_pixels(frame.width(), frame.height()) else {
            log::warn!("Landmark set has {} points, eye corners missing", face.len());
            return frame.clone();
        };
        let Some(rect) = compute_placement(&eyes, sprite.width(), sprite.height()) else {
            log::debug!("Degenerate placement for eyes {eyes:?}");
            return frame.clone();
        };

        if !rect.fits_within(frame.width(), frame.height()) {
            log::info!("Placement {rect:?} falls outside the frame, skipping overlay");
            return frame.clone();
        }

        let mut annotated = frame.clone();
        let scaled = sprite.resized(rect.width, rect.height);
        blend(&mut annotated, &scaled, rect.x, rect.y);
        annotated
    }
}
