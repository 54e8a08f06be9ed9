use crate::capture::domain::frame_reader::FrameReader;
use crate::shared::constants::{CAPTURE_FORMAT, DEFAULT_CAMERA_DEVICE};
use crate::shared::frame::Frame;

/// Frames decoded and discarded before the returned one, giving the
/// sensor time to settle exposure and white balance.
pub const DEFAULT_WARMUP_FRAMES: usize = 5;

/// Packets read before giving up on a device that never yields a frame.
const MAX_PACKETS: usize = 300;

/// Grabs a single still from a webcam through ffmpeg's device layer
/// (libavdevice: v4l2, avfoundation or dshow depending on platform).
pub struct FfmpegCameraReader {
    device: String,
    warmup_frames: usize,
}

impl FfmpegCameraReader {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            warmup_frames: DEFAULT_WARMUP_FRAMES,
        }
    }

    pub fn with_warmup_frames(mut self, frames: usize) -> Self {
        self.warmup_frames = frames;
        self
    }
}

impl Default for FfmpegCameraReader {
    fn default() -> Self {
        Self::new(DEFAULT_CAMERA_DEVICE)
    }
}

fn find_capture_format(name: &str) -> Option<ffmpeg_next::format::format::Input> {
    ffmpeg_next::device::input::video().find(|f| f.name() == name)
}

fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}

fn try_receive_frame(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if decoder.receive_frame(&mut decoded).is_ok() {
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(&rgb_frame, width, height);
        Ok(Some(Frame::new(pixels, width, height)))
    } else {
        Ok(None)
    }
}

impl FrameReader for FfmpegCameraReader {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let format = find_capture_format(CAPTURE_FORMAT)
            .ok_or_else(|| format!("Capture backend '{CAPTURE_FORMAT}' is not available"))?;
        log::info!("Opening camera {} via {CAPTURE_FORMAT}", self.device);

        let mut ictx = ffmpeg_next::format::open_with(
            &self.device,
            &ffmpeg_next::format::format::Format::Input(format),
            ffmpeg_next::Dictionary::new(),
        )
        .map_err(|e| format!("Failed to open camera {}: {e}", self.device))?
        .input();

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("Camera exposes no video stream")?;
        let video_stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let mut decoded_count = 0;
        for (stream, packet) in ictx.packets().take(MAX_PACKETS) {
            if stream.index() != video_stream_index {
                continue;
            }
            if decoder.send_packet(&packet).is_err() {
                continue;
            }
            while let Some(frame) = try_receive_frame(&mut decoder, &mut scaler, width, height)? {
                if decoded_count >= self.warmup_frames {
                    log::info!("Captured {width}x{height} frame from {}", self.device);
                    return Ok(frame);
                }
                decoded_count += 1;
            }
        }

        Err(format!("Camera {} produced no frames", self.device).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_platform_device() {
        let reader = FfmpegCameraReader::default();
        assert_eq!(reader.device, DEFAULT_CAMERA_DEVICE);
        assert_eq!(reader.warmup_frames, DEFAULT_WARMUP_FRAMES);
    }

    #[test]
    fn test_with_warmup_frames() {
        let reader = FfmpegCameraReader::new("/dev/video2").with_warmup_frames(0);
        assert_eq!(reader.device, "/dev/video2");
        assert_eq!(reader.warmup_frames, 0);
    }

    #[test]
    fn test_missing_device_returns_error() {
        let mut reader = FfmpegCameraReader::new("/nonexistent/video99");
        assert!(reader.read().is_err());
    }
}
