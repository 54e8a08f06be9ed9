pub mod landmark_provider;
pub mod landmark_set;
