//! Persona gallery
//!
//! A personal media library kept entirely in directory and file names.
//! Files land in an unsorted staging area, get tagged and filed under
//! `<origin>/<persona>/<index>_<tags><.ext>`, and can be browsed by persona
//! and tag afterwards.

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod media;
pub mod state;

pub use config::Config;
pub use error::{EntityKind, GalleryError, GalleryResult};
pub use media::kind::{classify, MediaKind};
pub use media::tags::{Tag, TagRegistry};
pub use state::bundle::{filter_bundle, FilterOptions};
pub use state::entity::{Entity, FileEntity};
pub use state::gallery::{Gallery, Origin, Persona, Portrayal};
pub use state::library::Library;
pub use state::session::{Mode, Session, View};
pub use state::unsorted::{list_all_unsorted, UnsortedFile};
