use crate::detection::domain::landmark_set::LandmarkSet;
use crate::shared::frame::Frame;

/// Domain interface for facial landmark detection.
///
/// Returns one [`LandmarkSet`] per detected face, most confident first.
/// Implementations may hold inference sessions, hence `&mut self`.
pub trait LandmarkProvider: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>>;
}
