pub mod blazeface_face_locator;
pub mod execution_provider;
mod math;
pub mod model_factory;
pub mod onnx_face_mesh_provider;
pub mod shared_landmark_provider;
mod tensor_input;
