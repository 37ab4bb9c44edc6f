/// Configuration
///
/// Read once at startup from a JSON file:
///
/// ```json
/// { "galleryFolder": "/media/gallery", "unsortedFolder": "/media/inbox", "tags": { "a": "Outdoor" } }
/// ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GalleryError, GalleryResult};
use crate::media::tags::TagRegistry;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PERSONA_GALLERY_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Root of the origin/persona tree
    pub gallery_folder: PathBuf,
    /// Staging area for files awaiting classification
    pub unsorted_folder: PathBuf,
    /// Tag key (one character) to display label
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Config {
    /// Where the config file is looked up when no path is given
    ///
    /// - `$PERSONA_GALLERY_CONFIG` if set
    /// - otherwise `<config dir>/persona-gallery/config.json`
    ///   (e.g. ~/.config/persona-gallery/config.json on Linux)
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("persona-gallery");
        path.push("config.json");
        Some(path)
    }

    /// Parse and validate a config document
    pub fn from_json(json: &str) -> GalleryResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> GalleryResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
        let config = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            tags = config.tags.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn to_json(&self) -> GalleryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the filename encoding cannot represent
    pub fn validate(&self) -> GalleryResult<()> {
        if self.gallery_folder.as_os_str().is_empty() {
            return Err(GalleryError::Config("galleryFolder is empty".to_string()));
        }
        if self.unsorted_folder.as_os_str().is_empty() {
            return Err(GalleryError::Config("unsortedFolder is empty".to_string()));
        }
        self.tag_registry().map(|_| ())
    }

    /// Build the tag registry described by `tags`
    pub fn tag_registry(&self) -> GalleryResult<TagRegistry> {
        TagRegistry::from_labels(self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
