/// Media classifier
///
/// Maps a file extension to the kind of media it holds. Lookup is
/// case-insensitive; unknown extensions are an explicit failure.

use std::fmt;
use std::path::Path;

use crate::error::{GalleryError, GalleryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("IMAGE"),
            MediaKind::Video => f.write_str("VIDEO"),
        }
    }
}

/// Supported extensions (lowercase, without the dot)
const EXTENSION_TABLE: &[(&str, MediaKind)] = &[
    ("mp4", MediaKind::Video),
    ("webm", MediaKind::Video),
    ("mkv", MediaKind::Video),
    ("avi", MediaKind::Video),
    ("mov", MediaKind::Video),
    ("jpg", MediaKind::Image),
    ("jpeg", MediaKind::Image),
    ("png", MediaKind::Image),
    ("gif", MediaKind::Image),
    ("bmp", MediaKind::Image),
    ("webp", MediaKind::Image),
];

/// Classify an extension such as `"JPG"` or `".mp4"`
pub fn classify(extension: &str) -> GalleryResult<MediaKind> {
    let ext = extension.trim_start_matches('.').to_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| GalleryError::UnsupportedMedia(extension.to_string()))
}

/// Classify a file by the extension of its path
pub fn classify_path(path: &Path) -> GalleryResult<MediaKind> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    classify(&ext)
}

/// Whether a file can be previewed (its extension is in the table)
pub fn is_previewable(path: &Path) -> bool {
    classify_path(path).is_ok()
}
