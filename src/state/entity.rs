/// Read-only capability for gallery entities
///
/// Origins, personas and portrayals can be inspected but never mutated
/// through their handles. Every mutating operation exists only to report
/// `ForbiddenOperation`; the portrayal factory is the sole writer.

use std::path::Path;

use crate::error::{EntityKind, GalleryError, GalleryResult};

pub trait Entity {
    const KIND: EntityKind;

    /// Absolute location on disk
    fn path(&self) -> &Path;

    /// Final path component
    fn name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn rename(&self, _new_name: &str) -> GalleryResult<()> {
        Err(GalleryError::forbidden(Self::KIND, "rename"))
    }

    fn move_to(&self, _destination: &Path) -> GalleryResult<()> {
        Err(GalleryError::forbidden(Self::KIND, "move"))
    }

    fn copy_to(&self, _destination: &Path) -> GalleryResult<()> {
        Err(GalleryError::forbidden(Self::KIND, "copy"))
    }

    fn delete(&self) -> GalleryResult<()> {
        Err(GalleryError::forbidden(Self::KIND, "delete"))
    }
}

/// Content-level operations only make sense on files
pub trait FileEntity: Entity {
    fn write_bytes(&self, _data: &[u8]) -> GalleryResult<()> {
        Err(GalleryError::forbidden(Self::KIND, "write"))
    }

    fn append_bytes(&self, _data: &[u8]) -> GalleryResult<()> {
        Err(GalleryError::forbidden(Self::KIND, "append"))
    }

    fn write_text(&self, text: &str) -> GalleryResult<()> {
        self.write_bytes(text.as_bytes())
    }

    fn append_text(&self, text: &str) -> GalleryResult<()> {
        self.append_bytes(text.as_bytes())
    }

    /// Read the whole file
    fn read_bytes(&self) -> GalleryResult<Vec<u8>> {
        std::fs::read(self.path()).map_err(|e| GalleryError::io(self.path(), e))
    }
}
