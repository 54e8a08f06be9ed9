/// BlazeFace short-range face detector (128×128 input).
pub const FACE_DETECTOR_MODEL_NAME: &str = "face_detection_short_range.onnx";

/// 468-point face mesh landmark regressor (192×192 input).
pub const FACE_MESH_MODEL_NAME: &str = "face_landmark.onnx";

/// Environment variable holding the base URL models are downloaded from.
pub const MODEL_BASE_URL_ENV: &str = "GLASSES_MODEL_BASE_URL";

/// Directory name used under the platform cache/config directories.
pub const APP_DIR_NAME: &str = "Glasses Filter";

pub const FILTERS_DIR: &str = "filters";
pub const DEFAULT_FILTER: &str = "black.png";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Platform capture backend and default device for webcam mode.
#[cfg(target_os = "linux")]
pub const CAPTURE_FORMAT: &str = "v4l2";
#[cfg(target_os = "linux")]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

#[cfg(target_os = "macos")]
pub const CAPTURE_FORMAT: &str = "avfoundation";
#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_DEVICE: &str = "0";

#[cfg(target_os = "windows")]
pub const CAPTURE_FORMAT: &str = "dshow";
#[cfg(target_os = "windows")]
pub const DEFAULT_CAMERA_DEVICE: &str = "video=Integrated Camera";

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const CAPTURE_FORMAT: &str = "v4l2";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
