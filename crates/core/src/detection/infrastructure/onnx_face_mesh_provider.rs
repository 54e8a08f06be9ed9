/// Two-stage face mesh landmark provider using ONNX Runtime via `ort`.
///
/// BlazeFace locates faces; each face is cropped to a square region around
/// its box and passed to the 468-point mesh regressor. Landmarks are mapped
/// back to normalized full-frame coordinates.
use std::path::Path;

use crate::detection::domain::landmark_provider::LandmarkProvider;
use crate::detection::domain::landmark_set::{LandmarkSet, FACE_MESH_POINTS};
use crate::shared::frame::Frame;

use super::blazeface_face_locator::{BlazefaceLocator, FaceBox};
use super::execution_provider::load_session;
use super::math::sigmoid;
use super::tensor_input::{sample_roi, Roi, TensorLayout};

/// Face mesh model input resolution.
const MESH_INPUT_SIZE: u32 = 192;

/// How far the crop extends beyond the detected box (side = 1.5 × box).
const ROI_SCALE: f64 = 1.5;

/// Minimum face-presence probability reported by the mesh model.
pub const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

pub struct OnnxFaceMeshProvider {
    locator: BlazefaceLocator,
    session: ort::session::Session,
    layout: TensorLayout,
    presence_threshold: f32,
}

impl OnnxFaceMeshProvider {
    pub fn new(
        detector_model: &Path,
        mesh_model: &Path,
        confidence: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let locator = BlazefaceLocator::new(detector_model, confidence)?;
        let session = load_session(mesh_model)?;
        let layout = TensorLayout::from_session(&session);
        log::info!("Face mesh provider ready ({layout:?} input)");
        Ok(Self {
            locator,
            session,
            layout,
            presence_threshold: DEFAULT_PRESENCE_THRESHOLD,
        })
    }

    fn regress(
        &mut self,
        frame: &Frame,
        roi: Roi,
    ) -> Result<Option<Vec<f32>>, Box<dyn std::error::Error>> {
        let input_tensor = sample_roi(frame, roi, MESH_INPUT_SIZE, self.layout, (0.0, 1.0));
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // Outputs: landmarks [.., 1404] and optionally a presence logit [.., 1]
        let mut landmarks = None;
        let mut presence = None;
        for i in 0..outputs.len() {
            let tensor = outputs[i].try_extract_array::<f32>()?;
            let data = tensor.as_slice().ok_or("Cannot get mesh output slice")?;
            if data.len() >= FACE_MESH_POINTS * 3 && landmarks.is_none() {
                landmarks = Some(data.to_vec());
            } else if data.len() == 1 {
                presence = Some(sigmoid(data[0]));
            }
        }

        let landmarks = landmarks.ok_or("Face mesh model produced no landmark tensor")?;
        if let Some(p) = presence {
            if p < self.presence_threshold {
                log::debug!("Face mesh: presence {p:.2} below threshold, dropping face");
                return Ok(None);
            }
        }
        Ok(Some(landmarks))
    }
}

impl LandmarkProvider for OnnxFaceMeshProvider {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let faces = self.locator.locate(frame)?;
        let mut sets = Vec::with_capacity(faces.len());
        for face in &faces {
            let roi = face_roi(face, frame.width(), frame.height());
            if let Some(raw) = self.regress(frame, roi)? {
                sets.push(map_mesh_points(&raw, roi, frame.width(), frame.height()));
            }
        }
        Ok(sets)
    }
}

/// Square crop centered on the face box, enlarged by [`ROI_SCALE`].
fn face_roi(face: &FaceBox, width: u32, height: u32) -> Roi {
    let fw = width as f64;
    let fh = height as f64;
    let cx = (face.x1 + face.x2) / 2.0 * fw;
    let cy = (face.y1 + face.y2) / 2.0 * fh;
    let side = ((face.x2 - face.x1) * fw).max((face.y2 - face.y1) * fh) * ROI_SCALE;
    Roi {
        x: cx - side / 2.0,
        y: cy - side / 2.0,
        width: side,
        height: side,
    }
}

/// Map raw mesh output (`x, y, z` triples in crop pixels) to normalized
/// frame coordinates. Depth is dropped.
fn map_mesh_points(raw: &[f32], roi: Roi, width: u32, height: u32) -> LandmarkSet {
    let scale_x = roi.width / MESH_INPUT_SIZE as f64;
    let scale_y = roi.height / MESH_INPUT_SIZE as f64;
    let points = raw
        .chunks_exact(3)
        .take(FACE_MESH_POINTS)
        .map(|p| {
            let x = roi.x + p[0] as f64 * scale_x;
            let y = roi.y + p[1] as f64 * scale_y;
            (x / width as f64, y / height as f64)
        })
        .collect();
    LandmarkSet::new(points)
}
