use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use glasses_core::detection::infrastructure::model_factory::ModelProgressFn;
use glasses_core::overlay::infrastructure::filter_directory::FilterDirectory;
use glasses_core::pipeline::apply_filter_use_case::ApplyFilterUseCase;
use glasses_core::pipeline::input_router::{process_input, select_input, InputSource};
use glasses_core::shared::frame::Frame;

use super::provider_cache::ProviderCache;
use super::WorkerMessage;

/// Parameters for an overlay job.
pub struct OverlayParams {
    pub source: InputSource,
    pub upload: Option<Frame>,
    pub webcam: Option<Frame>,
    pub filter_id: String,
    pub filters_dir: PathBuf,
    pub providers: Arc<ProviderCache>,
}

/// Spawn a background overlay worker.
pub fn spawn(params: OverlayParams) -> Receiver<WorkerMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();

    thread::spawn(move || {
        if let Err(e) = run_overlay(&tx, &params) {
            let _ = tx.send(WorkerMessage::Error(e.to_string()));
        }
    });

    rx
}

fn run_overlay(
    tx: &Sender<WorkerMessage>,
    params: &OverlayParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let upload = params.upload.as_ref();
    let webcam = params.webcam.as_ref();

    // Nothing to decorate, so skip loading models.
    if select_input(params.source, upload, webcam).is_none() {
        let _ = tx.send(WorkerMessage::Applied(None));
        return Ok(());
    }

    let tx_dl = tx.clone();
    let on_progress: ModelProgressFn = Arc::new(move |_name, dl, total| {
        let _ = tx_dl.send(WorkerMessage::DownloadProgress(dl, total));
    });
    let provider = params.providers.get_or_create(Some(on_progress))?;

    let mut use_case = ApplyFilterUseCase::new(
        Box::new(provider),
        Box::new(FilterDirectory::new(&params.filters_dir)),
    );
    let result = process_input(&mut use_case, params.source, upload, webcam, &params.filter_id);

    let _ = tx.send(WorkerMessage::Applied(result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasses_core::detection::domain::landmark_provider::LandmarkProvider;
    use glasses_core::detection::domain::landmark_set::LandmarkSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoFaces;

    impl LandmarkProvider for NoFaces {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }
    }

    fn counting_cache(builds: Arc<AtomicUsize>) -> Arc<ProviderCache> {
        ProviderCache::with_factory(move |_| {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NoFaces) as Box<dyn LandmarkProvider>)
        })
    }

    fn params(source: InputSource, upload: Option<Frame>, providers: Arc<ProviderCache>) -> OverlayParams {
        OverlayParams {
            source,
            upload,
            webcam: None,
            filter_id: "black.png".into(),
            filters_dir: PathBuf::from("/nonexistent/filters"),
            providers,
        }
    }

    #[test]
    fn test_absent_input_skips_provider() {
        let builds = Arc::new(AtomicUsize::new(0));
        let rx = spawn(params(
            InputSource::WebCam,
            Some(Frame::filled(4, 4, [9, 9, 9])),
            counting_cache(builds.clone()),
        ));
        assert!(matches!(rx.recv().unwrap(), WorkerMessage::Applied(None)));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_filter_returns_input() {
        let frame = Frame::filled(4, 4, [9, 9, 9]);
        let rx = spawn(params(
            InputSource::Upload,
            Some(frame.clone()),
            counting_cache(Arc::new(AtomicUsize::new(0))),
        ));
        match rx.recv().unwrap() {
            WorkerMessage::Applied(Some(out)) => assert_eq!(out, frame),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_provider_build_error_is_reported() {
        let cache = ProviderCache::with_factory(|_| Err("no models".into()));
        let rx = spawn(params(InputSource::Upload, Some(Frame::filled(2, 2, [0, 0, 0])), cache));
        match rx.recv().unwrap() {
            WorkerMessage::Error(e) => assert!(e.contains("no models"), "{e}"),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
