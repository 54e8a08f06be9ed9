pub mod frame_reader;
pub mod image_writer;
