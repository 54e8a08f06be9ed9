use std::sync::{Arc, Mutex};

use crate::detection::domain::landmark_provider::LandmarkProvider;
use crate::detection::domain::landmark_set::LandmarkSet;
use crate::shared::frame::Frame;

/// Shares one landmark provider between threads, serializing every call.
///
/// Detector sessions are not documented as safe for concurrent inference,
/// so concurrent front ends clone this handle instead of the detector.
#[derive(Clone)]
pub struct SharedLandmarkProvider {
    inner: Arc<Mutex<Box<dyn LandmarkProvider>>>,
}

impl SharedLandmarkProvider {
    pub fn new(provider: Box<dyn LandmarkProvider>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(provider)),
        }
    }
}

impl LandmarkProvider for SharedLandmarkProvider {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
        let mut provider = self
            .inner
            .lock()
            .map_err(|_| "Landmark provider lock poisoned")?;
        provider.detect(frame)
    }
}
