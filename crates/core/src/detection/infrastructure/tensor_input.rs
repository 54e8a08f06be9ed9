//! Image-to-tensor conversion shared by the detector and the mesh regressor.

use ndarray::Array4;
use ort::session::Session;

use crate::shared::frame::Frame;

/// Memory layout of a model's image input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, 3, H, W]`
    Nchw,
    /// `[1, H, W, 3]`
    Nhwc,
}

impl TensorLayout {
    /// Reads the layout from the session's first input; defaults to NCHW
    /// when the shape is dynamic or unreadable.
    pub fn from_session(session: &Session) -> Self {
        session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() == 4 && shape[3] == 3 {
                        Some(TensorLayout::Nhwc)
                    } else {
                        Some(TensorLayout::Nchw)
                    }
                } else {
                    None
                }
            })
            .unwrap_or(TensorLayout::Nchw)
    }

    fn shape(self, size: usize) -> (usize, usize, usize, usize) {
        match self {
            TensorLayout::Nchw => (1, 3, size, size),
            TensorLayout::Nhwc => (1, size, size, 3),
        }
    }
}

/// A rectangle in frame pixel coordinates. May extend past the frame edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roi {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Roi {
    pub fn full(frame: &Frame) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: frame.width() as f64,
            height: frame.height() as f64,
        }
    }
}

/// Nearest-neighbour resample of `roi` to `size × size`, scaled into
/// `range`. Samples outside the frame read as black.
pub fn sample_roi(
    frame: &Frame,
    roi: Roi,
    size: u32,
    layout: TensorLayout,
    range: (f32, f32),
) -> Array4<f32> {
    let src = frame.as_ndarray();
    let src_w = frame.width() as i64;
    let src_h = frame.height() as i64;
    let s = size as usize;
    let (lo, hi) = range;
    let span = hi - lo;

    let mut tensor = Array4::<f32>::from_elem(layout.shape(s), lo);

    for y in 0..s {
        let src_y = (roi.y + (y as f64 + 0.5) * roi.height / s as f64).floor() as i64;
        if src_y < 0 || src_y >= src_h {
            continue;
        }
        for x in 0..s {
            let src_x = (roi.x + (x as f64 + 0.5) * roi.width / s as f64).floor() as i64;
            if src_x < 0 || src_x >= src_w {
                continue;
            }
            for c in 0..3 {
                let v = lo + src[[src_y as usize, src_x as usize, c]] as f32 / 255.0 * span;
                match layout {
                    TensorLayout::Nchw => tensor[[0, c, y, x]] = v,
                    TensorLayout::Nhwc => tensor[[0, y, x, c]] = v,
                }
            }
        }
    }

    tensor
}
