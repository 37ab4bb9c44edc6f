/// Unsorted scanner
///
/// Enumerates the staging area recursively. Directory structure below the
/// staging root carries no meaning; only the files matter.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::WalkDir;

use crate::error::{GalleryError, GalleryResult};
use crate::media::kind::{self, MediaKind};

/// A file waiting in the staging area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsortedFile {
    path: PathBuf,
    modified: DateTime<Utc>,
}

impl UnsortedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last modification time, used for ordering
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Media kind, `None` when the file cannot be previewed
    pub fn media_kind(&self) -> Option<MediaKind> {
        kind::classify_path(&self.path).ok()
    }
}

/// Collect every file below `root`, oldest modification first
///
/// Symlinks are not followed, so a link cycle cannot trap the walk. A link
/// pointing at a directory is skipped rather than reported as a file.
pub fn list_all_unsorted(root: &Path) -> GalleryResult<Vec<UnsortedFile>> {
    tracing::debug!(root = %root.display(), "scanning unsorted files");

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path_is_symlink() && entry.path().is_dir() {
            tracing::debug!(path = %entry.path().display(), "skipping link to a directory");
            continue;
        }
        let modified = entry
            .metadata()?
            .modified()
            .map_err(|e| GalleryError::io(entry.path(), e))?;
        files.push(UnsortedFile {
            path: entry.into_path(),
            modified: DateTime::<Utc>::from(modified),
        });
    }

    // Stable sort keeps walk order among equal timestamps
    files.sort_by_key(|f| f.modified);

    tracing::debug!(count = files.len(), "unsorted scan complete");
    Ok(files)
}

/// Run `list_all_unsorted` on the blocking pool
pub async fn list_all_unsorted_async(root: PathBuf) -> GalleryResult<Vec<UnsortedFile>> {
    task::spawn_blocking(move || list_all_unsorted(&root)).await?
}
