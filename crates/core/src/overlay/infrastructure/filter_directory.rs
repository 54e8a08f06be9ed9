use std::path::{Path, PathBuf};

use crate::overlay::domain::sprite_source::SpriteSource;
use crate::shared::sprite::Sprite;

/// Serves sprites from PNG files in a directory, keyed by file name.
pub struct FilterDirectory {
    root: PathBuf,
}

impl FilterDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path for `filter_id`, or `None` if the id could escape the directory.
    pub fn path_for(&self, filter_id: &str) -> Option<PathBuf> {
        let id = Path::new(filter_id);
        let is_plain_name = id.file_name().map(|n| n == id.as_os_str()).unwrap_or(false);
        if filter_id.is_empty() || !is_plain_name || filter_id.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(id))
    }

    /// File names of the PNG filters present, sorted.
    pub fn available(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.to_lowercase().ends_with(".png"))
            .collect();
        names.sort();
        names
    }
}

impl SpriteSource for FilterDirectory {
    fn load(&self, filter_id: &str) -> Option<Sprite> {
        let Some(path) = self.path_for(filter_id) else {
            log::warn!("Rejected filter id {filter_id:?}");
            return None;
        };
        if !path.exists() {
            log::warn!("Filter not found: {}", path.display());
            return None;
        }
        match image::open(&path) {
            Ok(img) => Some(Sprite::new(img.into_rgba8())),
            Err(e) => {
                log::warn!("Failed to decode filter {}: {e}", path.display());
                None
            }
        }
    }
}
