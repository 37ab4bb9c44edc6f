/// Portrayal factory
///
/// The only code path that writes into the gallery. Promotes a staged file
/// into a persona by allocating the next index and moving the file under
/// its encoded name.
///
/// Index allocation and the rename sequence run under a per-persona lock,
/// so two creations against the same persona never share an index. The
/// allocated index is checked before anything moves and again before the
/// final rename; a collision is reported as `RaceCondition` instead of
/// overwriting what is there.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::codec::{self, IN_FLIGHT_PREFIX};
use crate::error::{GalleryError, GalleryResult};
use crate::media::tags::Tag;
use crate::state::entity::Entity;
use crate::state::gallery::{Persona, Portrayal};

#[derive(Debug, Default)]
pub struct PortrayalFactory {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PortrayalFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock serializing writes into one persona
    fn persona_lock(&self, persona: &Persona) -> GalleryResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| GalleryError::Internal("persona lock table poisoned".to_string()))?;
        Ok(Arc::clone(
            locks.entry(persona.path().to_path_buf()).or_default(),
        ))
    }

    /// Move `source` into `persona` as a new portrayal carrying `tags`
    ///
    /// Steps, all under the persona's lock:
    /// 1. allocate the index following the highest one in use, and check
    ///    that nothing already occupies it
    /// 2. rename the source in place to a random temporary name
    /// 3. move it into the persona directory
    /// 4. rename it to `<index>_<tags><.ext>`
    ///
    /// A failure part way leaves the file wherever the last successful step
    /// put it; the error names that location.
    pub fn create_portrayal(
        &self,
        persona: &Persona,
        tags: &[Tag],
        source: &Path,
    ) -> GalleryResult<Portrayal> {
        let lock = self.persona_lock(persona)?;
        let _guard = lock
            .lock()
            .map_err(|_| GalleryError::Internal("persona lock poisoned".to_string()))?;

        if !source.is_file() {
            return Err(GalleryError::io(
                source,
                std::io::Error::new(std::io::ErrorKind::NotFound, "source is not a file"),
            ));
        }

        let next_index = next_index(persona)?;
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let final_name = codec::encode_filename(next_index, tags, &extension);
        let final_path = persona.path().join(&final_name);

        // Nothing has moved yet, so a collision here leaves the source in place
        if index_taken(persona, next_index, &final_path)? {
            tracing::warn!(
                persona = %persona.path().display(),
                index = next_index,
                source = %source.display(),
                "allocated index is already taken; nothing moved"
            );
            return Err(GalleryError::RaceCondition {
                persona: persona.path().to_path_buf(),
                index: next_index,
            });
        }

        let temp_name = if extension.is_empty() {
            format!("{}{}", IN_FLIGHT_PREFIX, Uuid::new_v4().simple())
        } else {
            format!("{}{}.{}", IN_FLIGHT_PREFIX, Uuid::new_v4().simple(), extension)
        };
        let staged = source.with_file_name(&temp_name);
        fs::rename(source, &staged).map_err(|e| GalleryError::io(source, e))?;

        let moved = persona.path().join(&temp_name);
        move_file(&staged, &moved)?;

        if index_taken(persona, next_index, &final_path)? {
            tracing::error!(
                persona = %persona.path().display(),
                index = next_index,
                left_at = %moved.display(),
                "index was taken while moving; file left under its temporary name"
            );
            return Err(GalleryError::RaceCondition {
                persona: persona.path().to_path_buf(),
                index: next_index,
            });
        }
        fs::rename(&moved, &final_path).map_err(|e| GalleryError::io(&moved, e))?;

        tracing::info!(
            persona = %persona.path().display(),
            index = next_index,
            name = %final_name,
            from = %source.display(),
            "created portrayal"
        );

        persona.find_portrayal(next_index)?.ok_or_else(|| {
            GalleryError::Internal(format!("portrayal {} vanished after creation", final_name))
        })
    }
}

/// One past the highest index in use, 0 for an empty persona
///
/// Equals the portrayal count while indices are contiguous, and never hands
/// out an index below one already used.
fn next_index(persona: &Persona) -> GalleryResult<u64> {
    match persona.list_portrayals()?.last() {
        None => Ok(0),
        Some(last) => last.index().checked_add(1).ok_or_else(|| GalleryError::MalformedLayout {
            path: last.path().to_path_buf(),
            reason: "no index left after this one".to_string(),
        }),
    }
}

/// Whether `final_path` exists or another portrayal already uses `index`
fn index_taken(persona: &Persona, index: u64, final_path: &Path) -> GalleryResult<bool> {
    Ok(final_path.exists() || persona_has_index(persona, index)?)
}

/// Whether any file other than a temporary one already decodes to `index`
///
/// Directories are skipped, matching the persona listing.
fn persona_has_index(persona: &Persona, index: u64) -> GalleryResult<bool> {
    let entries = fs::read_dir(persona.path()).map_err(|e| GalleryError::io(persona.path(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| GalleryError::io(persona.path(), e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if codec::is_in_flight(&name) || entry.path().is_dir() {
            continue;
        }
        if matches!(codec::decode_index(&name), Ok(found) if found == index) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Rename across directories, copying when the rename crosses filesystems
fn move_file(from: &Path, to: &Path) -> GalleryResult<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(from = %from.display(), error = %rename_err, "rename failed, copying instead");
            fs::copy(from, to).map_err(|_| GalleryError::io(from, rename_err))?;
            fs::remove_file(from).map_err(|e| GalleryError::io(from, e))
        }
    }
}
