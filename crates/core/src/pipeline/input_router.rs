use std::fmt;
use std::str::FromStr;

use crate::pipeline::apply_filter_use_case::ApplyFilterUseCase;
use crate::shared::frame::Frame;

/// Where the frame to decorate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    #[default]
    Upload,
    WebCam,
}

impl InputSource {
    pub const ALL: &[InputSource] = &[InputSource::Upload, InputSource::WebCam];
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Upload => write!(f, "Upload"),
            InputSource::WebCam => write!(f, "WebCam"),
        }
    }
}

impl FromStr for InputSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upload" => Ok(InputSource::Upload),
            "webcam" => Ok(InputSource::WebCam),
            other => Err(format!("Input source must be 'upload' or 'webcam', got '{other}'")),
        }
    }
}

/// The candidate frame matching the active source.
pub fn select_input<T>(source: InputSource, upload: Option<T>, webcam: Option<T>) -> Option<T> {
    match source {
        InputSource::Upload => upload,
        InputSource::WebCam => webcam,
    }
}

/// Routes the active source's frame through the overlay.
///
/// An absent frame yields `None`. Frames are RGB on both sides, so no
/// channel reordering wraps the call.
pub fn process_input(
    use_case: &mut ApplyFilterUseCase,
    source: InputSource,
    upload: Option<&Frame>,
    webcam: Option<&Frame>,
    filter_id: &str,
) -> Option<Frame> {
    let frame = select_input(source, upload, webcam)?;
    Some(use_case.execute(frame, filter_id))
}
