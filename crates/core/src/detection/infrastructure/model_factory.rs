use std::path::PathBuf;
use std::sync::Arc;

use crate::shared::constants::{FACE_DETECTOR_MODEL_NAME, FACE_MESH_MODEL_NAME};
use crate::shared::model_resolver::{self, model_url, ProgressFn};

use super::onnx_face_mesh_provider::OnnxFaceMeshProvider;

/// Download progress: `(model_name, bytes_downloaded, total_bytes)`.
pub type ModelProgressFn = Arc<dyn Fn(&str, u64, u64) + Send + Sync>;

/// Where model files may be found or fetched from.
#[derive(Clone, Debug, Default)]
pub struct ModelSources {
    /// Cache directory; the platform user cache when unset.
    pub cache_dir: Option<PathBuf>,
    /// Directory checked after the user cache, before downloading.
    pub bundled_dir: Option<PathBuf>,
    /// Base URL the model file names are appended to.
    pub base_url: Option<String>,
}

impl ModelSources {
    /// Sources with the base URL taken from the environment.
    pub fn from_env(bundled_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir: None,
            bundled_dir,
            base_url: model_resolver::base_url_from_env(),
        }
    }
}

/// Resolve both models and build the two-stage face mesh provider.
pub fn create_face_mesh_provider(
    sources: &ModelSources,
    confidence: f64,
    on_progress: Option<ModelProgressFn>,
) -> Result<OnnxFaceMeshProvider, Box<dyn std::error::Error>> {
    let detector_path = resolve_model(sources, FACE_DETECTOR_MODEL_NAME, on_progress.clone())?;
    let mesh_path = resolve_model(sources, FACE_MESH_MODEL_NAME, on_progress)?;
    OnnxFaceMeshProvider::new(&detector_path, &mesh_path, confidence)
}

fn resolve_model(
    sources: &ModelSources,
    name: &'static str,
    on_progress: Option<ModelProgressFn>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let url = sources.base_url.as_deref().map(|base| model_url(base, name));
    let progress: Option<ProgressFn> =
        on_progress.map(|cb| -> ProgressFn { Box::new(move |dl, total| cb(name, dl, total)) });
    let bundled_dir = sources.bundled_dir.as_deref();
    let path = match &sources.cache_dir {
        Some(cache_dir) => {
            model_resolver::resolve_in(cache_dir, name, url.as_deref(), bundled_dir, progress)?
        }
        None => model_resolver::resolve(name, url.as_deref(), bundled_dir, progress)?,
    };
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated(cache: &tempfile::TempDir, bundled: &tempfile::TempDir) -> ModelSources {
        ModelSources {
            cache_dir: Some(cache.path().to_path_buf()),
            bundled_dir: Some(bundled.path().to_path_buf()),
            base_url: None,
        }
    }

    #[test]
    fn test_missing_models_without_url_fail_with_name() {
        let cache = tempfile::tempdir().unwrap();
        let bundled = tempfile::tempdir().unwrap();
        let err = create_face_mesh_provider(&isolated(&cache, &bundled), 0.5, None)
            .err()
            .unwrap();
        assert!(err.to_string().contains(FACE_DETECTOR_MODEL_NAME));
    }

    #[test]
    fn test_resolve_model_reads_injected_cache() {
        let cache = tempfile::tempdir().unwrap();
        let bundled = tempfile::tempdir().unwrap();
        std::fs::write(cache.path().join(FACE_MESH_MODEL_NAME), b"mesh").unwrap();
        let path = resolve_model(&isolated(&cache, &bundled), FACE_MESH_MODEL_NAME, None).unwrap();
        assert_eq!(path, cache.path().join(FACE_MESH_MODEL_NAME));
    }

    #[test]
    fn test_from_env_uses_user_cache() {
        assert!(ModelSources::from_env(None).cache_dir.is_none());
    }
}
