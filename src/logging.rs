use tracing_subscriber::EnvFilter;

use crate::error::{GalleryError, GalleryResult};

/// Install the global fmt subscriber, filtered by `RUST_LOG` (default `info`)
///
/// Fails if a subscriber is already installed.
pub fn init_tracing() -> GalleryResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init()
        .map_err(|e| GalleryError::Internal(format!("failed to install tracing subscriber: {}", e)))
}
