/// Error taxonomy for the gallery core
///
/// Decode and classify failures propagate unchanged to the caller.
/// Lookup misses are never errors; they come back as `None`.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::session::Mode;

/// The kind of filesystem entity a forbidden operation was attempted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Origin,
    Persona,
    Portrayal,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Origin => "Origin",
            EntityKind::Persona => "Persona",
            EntityKind::Portrayal => "Portrayal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("INVALID_TAG: '{0}' is not a configured tag key")]
    InvalidTag(char),
    #[error("MALFORMED_NAME: {name}: {reason}")]
    MalformedName { name: String, reason: String },
    #[error("UNSUPPORTED_MEDIA: '{0}'")]
    UnsupportedMedia(String),
    #[error("FORBIDDEN: {operation} is forbidden on {kind}")]
    ForbiddenOperation {
        kind: EntityKind,
        operation: &'static str,
    },
    #[error("RACE_CONDITION: index {index} already taken in {}", .persona.display())]
    RaceCondition { persona: PathBuf, index: u64 },
    #[error("WRONG_MODE: only allowed in {expected} mode, session is {actual}")]
    WrongMode { expected: Mode, actual: Mode },
    #[error("MALFORMED_LAYOUT: {}: {reason}", .path.display())]
    MalformedLayout { path: PathBuf, reason: String },
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("IO_FAILURE: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("WALK_FAILURE: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl GalleryError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed_name(name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn forbidden(kind: EntityKind, operation: &'static str) -> Self {
        Self::ForbiddenOperation { kind, operation }
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<tokio::task::JoinError> for GalleryError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Task join error: {}", value))
    }
}

pub type GalleryResult<T> = Result<T, GalleryError>;
