pub mod capture_worker;
pub mod overlay_worker;
pub mod provider_cache;

use glasses_core::shared::frame::Frame;

/// Messages sent from a worker thread to the UI.
#[derive(Debug)]
pub enum WorkerMessage {
    DownloadProgress(u64, u64),
    Captured(Frame),
    /// `None` when the active source had no frame.
    Applied(Option<Frame>),
    Error(String),
}
