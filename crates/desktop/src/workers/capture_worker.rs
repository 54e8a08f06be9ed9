use std::thread;

use crossbeam_channel::Receiver;

use glasses_core::capture::domain::frame_reader::FrameReader;

use super::WorkerMessage;

/// Grab one frame on a background thread.
pub fn spawn(mut reader: Box<dyn FrameReader>) -> Receiver<WorkerMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();

    thread::spawn(move || {
        let message = match reader.read() {
            Ok(frame) => {
                log::debug!("Captured {}x{} frame", frame.width(), frame.height());
                WorkerMessage::Captured(frame)
            }
            Err(e) => WorkerMessage::Error(format!("Capture failed: {e}")),
        };
        let _ = tx.send(message);
    });

    rx
}
