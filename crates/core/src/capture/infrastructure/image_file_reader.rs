use std::path::PathBuf;

use crate::capture::domain::frame_reader::FrameReader;
use crate::shared::frame::Frame;

/// Decodes a still image file (the "upload" source) into an RGB frame.
///
/// Alpha, if present, is discarded.
pub struct ImageFileReader {
    path: PathBuf,
}

impl ImageFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameReader for ImageFileReader {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()))?
            .into_rgb8();
        let (width, height) = img.dimensions();
        log::debug!("Read {width}x{height} image from {}", self.path.display());
        Ok(Frame::new(img.into_raw(), width, height))
    }
}
