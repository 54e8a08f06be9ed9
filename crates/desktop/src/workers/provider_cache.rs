use std::sync::{Arc, Mutex};

use glasses_core::detection::domain::landmark_provider::LandmarkProvider;
use glasses_core::detection::infrastructure::model_factory::{
    create_face_mesh_provider, ModelProgressFn, ModelSources,
};
use glasses_core::detection::infrastructure::shared_landmark_provider::SharedLandmarkProvider;

type ProviderFactory = Box<
    dyn Fn(Option<ModelProgressFn>) -> Result<Box<dyn LandmarkProvider>, Box<dyn std::error::Error>>
        + Send
        + Sync,
>;

/// Builds the landmark provider on first use and hands out shared handles.
///
/// Models are resolved (and possibly downloaded) by the first job that
/// needs them; later jobs reuse the same sessions.
pub struct ProviderCache {
    factory: ProviderFactory,
    slot: Mutex<Option<SharedLandmarkProvider>>,
}

impl ProviderCache {
    pub fn new(sources: ModelSources, confidence: f64) -> Arc<Self> {
        Self::with_factory(move |on_progress| {
            let provider = create_face_mesh_provider(&sources, confidence, on_progress)?;
            Ok(Box::new(provider) as Box<dyn LandmarkProvider>)
        })
    }

    pub fn with_factory<F>(factory: F) -> Arc<Self>
    where
        F: Fn(Option<ModelProgressFn>) -> Result<Box<dyn LandmarkProvider>, Box<dyn std::error::Error>>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self {
            factory: Box::new(factory),
            slot: Mutex::new(None),
        })
    }

    /// The shared provider, building it if this is the first call.
    /// A failed build is not cached, so the next job retries.
    pub fn get_or_create(
        &self,
        on_progress: Option<ModelProgressFn>,
    ) -> Result<SharedLandmarkProvider, Box<dyn std::error::Error>> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| "Provider cache lock poisoned")?;
        if let Some(provider) = slot.as_ref() {
            return Ok(provider.clone());
        }
        log::info!("Building landmark provider");
        let shared = SharedLandmarkProvider::new((self.factory)(on_progress)?);
        *slot = Some(shared.clone());
        Ok(shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasses_core::detection::domain::landmark_set::LandmarkSet;
    use glasses_core::shared::frame::Frame;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoFaces;

    impl LandmarkProvider for NoFaces {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_builds_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let cache = ProviderCache::with_factory(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NoFaces) as Box<dyn LandmarkProvider>)
        });

        let mut first = cache.get_or_create(None).unwrap();
        let mut second = cache.get_or_create(None).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(first.detect(&Frame::filled(2, 2, [0, 0, 0])).unwrap().is_empty());
        assert!(second.detect(&Frame::filled(2, 2, [0, 0, 0])).unwrap().is_empty());
    }

    #[test]
    fn test_failed_build_is_retried() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let cache = ProviderCache::with_factory(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("model missing".into())
            } else {
                Ok(Box::new(NoFaces) as Box<dyn LandmarkProvider>)
            }
        });

        let err = cache.get_or_create(None).err().unwrap();
        assert!(err.to_string().contains("model missing"));
        assert!(cache.get_or_create(None).is_ok());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}
