use std::path::Path;

use crate::capture::domain::frame_reader::FrameReader;
use crate::capture::domain::image_writer::ImageWriter;
use crate::pipeline::apply_filter_use_case::ApplyFilterUseCase;
use crate::shared::frame::Frame;

/// Single-image overlay pipeline: read → apply filter → write.
pub struct OverlayImageUseCase {
    reader: Box<dyn FrameReader>,
    image_writer: Box<dyn ImageWriter>,
    apply: ApplyFilterUseCase,
}

impl OverlayImageUseCase {
    pub fn new(
        reader: Box<dyn FrameReader>,
        image_writer: Box<dyn ImageWriter>,
        apply: ApplyFilterUseCase,
    ) -> Self {
        Self {
            reader,
            image_writer,
            apply,
        }
    }

    /// Reads one frame, decorates it and writes the result to `output_path`.
    ///
    /// The output is written even when no overlay could be drawn.
    pub fn execute(
        &mut self,
        filter_id: &str,
        output_path: &Path,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let frame = self.reader.read()?;
        let result = self.apply.execute(&frame, filter_id);
        self.image_writer.write(output_path, &result)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::landmark_provider::LandmarkProvider;
    use crate::detection::domain::landmark_set::{
        LandmarkSet, FACE_MESH_POINTS, LEFT_EYE_OUTER, RIGHT_EYE_OUTER,
    };
    use crate::overlay::domain::sprite_source::SpriteSource;
    use crate::shared::sprite::Sprite;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubReader {
        frame: Option<Frame>,
    }

    impl FrameReader for StubReader {
        fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            self.frame.take().ok_or_else(|| "No frame".into())
        }
    }

    struct StubImageWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl StubImageWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    struct StubProvider {
        faces: Vec<LandmarkSet>,
    }

    impl LandmarkProvider for StubProvider {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
            Ok(self.faces.clone())
        }
    }

    struct RedSprite;

    impl SpriteSource for RedSprite {
        fn load(&self, _filter_id: &str) -> Option<Sprite> {
            Some(Sprite::new(RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]))))
        }
    }

    fn centered_face() -> LandmarkSet {
        let mut points = vec![(0.5, 0.5); FACE_MESH_POINTS];
        points[LEFT_EYE_OUTER] = (0.25, 0.5);
        points[RIGHT_EYE_OUTER] = (0.5, 0.5);
        LandmarkSet::new(points)
    }

    fn use_case(frame: Option<Frame>, faces: Vec<LandmarkSet>, writer: StubImageWriter) -> OverlayImageUseCase {
        OverlayImageUseCase::new(
            Box::new(StubReader { frame }),
            Box::new(writer),
            ApplyFilterUseCase::new(Box::new(StubProvider { faces }), Box::new(RedSprite)),
        )
    }

    // --- Tests ---

    #[test]
    fn test_writes_decorated_frame() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(Some(Frame::filled(100, 100, [0, 0, 0])), vec![centered_face()], writer);

        let result = uc.execute("black.png", Path::new("out.png")).unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!(written[0].1, result);
        // Eyes at x=25 and x=50 -> 50px wide sprite centered on (37, 50)
        assert_eq!(result.pixel(37, 50), [255, 0, 0]);
    }

    #[test]
    fn test_no_faces_still_writes_image() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let input = Frame::filled(100, 80, [7, 7, 7]);
        let mut uc = use_case(Some(input.clone()), vec![], writer);

        uc.execute("black.png", Path::new("out.png")).unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].1, input);
    }

    #[test]
    fn test_reader_error_propagates() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(None, vec![], writer);

        assert!(uc.execute("black.png", Path::new("out.png")).is_err());
        assert!(written.lock().unwrap().is_empty());
    }
}
