use crate::shared::frame::Frame;

/// Produces one RGB frame from a still image or a live capture device.
pub trait FrameReader: Send {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;
}
