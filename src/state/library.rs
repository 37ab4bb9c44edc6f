/// Library facade
///
/// Opens a gallery and its staging area from configuration and exposes
/// the queries and the one mutation a front end needs, with blocking-pool
/// variants for the slow ones.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

use crate::codec;
use crate::config::Config;
use crate::error::{GalleryError, GalleryResult};
use crate::media::kind::{self, MediaKind};
use crate::media::tags::{Tag, TagRegistry};
use crate::state::bundle::{self, FilterOptions};
use crate::state::factory::PortrayalFactory;
use crate::state::gallery::{Gallery, Origin, Persona, Portrayal};
use crate::state::unsorted::{self, UnsortedFile};

/// The Library ties the gallery tree, the staging area and the tag
/// registry together. It is the entry point a front end talks to.
///
/// Cloning is cheap; clones share the same factory, so per-persona
/// serialization of writes holds across clones.
#[derive(Debug, Clone)]
pub struct Library {
    gallery: Gallery,
    unsorted_root: PathBuf,
    factory: Arc<PortrayalFactory>,
}

impl Library {
    /// Open a library described by a validated configuration.
    ///
    /// Both folders must already exist; the core never creates them.
    pub fn open(config: &Config) -> GalleryResult<Self> {
        let tags = config.tag_registry()?;
        for (label, dir) in [
            ("galleryFolder", &config.gallery_folder),
            ("unsortedFolder", &config.unsorted_folder),
        ] {
            if !dir.is_dir() {
                return Err(GalleryError::Config(format!(
                    "{} '{}' is not a directory",
                    label,
                    dir.display()
                )));
            }
        }

        tracing::info!(
            gallery = %config.gallery_folder.display(),
            unsorted = %config.unsorted_folder.display(),
            tags = tags.len(),
            "library opened"
        );

        Ok(Library {
            gallery: Gallery::new(&config.gallery_folder, Arc::new(tags)),
            unsorted_root: config.unsorted_folder.clone(),
            factory: Arc::new(PortrayalFactory::new()),
        })
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn tags(&self) -> &TagRegistry {
        self.gallery.tags()
    }

    pub fn unsorted_root(&self) -> &Path {
        &self.unsorted_root
    }

    // ========== Queries ==========

    pub fn list_origins(&self) -> GalleryResult<Vec<Origin>> {
        self.gallery.list_origins()
    }

    pub fn find_origin(&self, name: &str) -> GalleryResult<Option<Origin>> {
        self.gallery.find_origin(name)
    }

    pub fn find_persona(&self, origin: &str, persona: &str) -> GalleryResult<Option<Persona>> {
        self.gallery.find_persona(origin, persona)
    }

    pub fn all_portrayals(&self) -> GalleryResult<Vec<Portrayal>> {
        self.gallery.all_portrayals()
    }

    /// Staged files, oldest first
    pub fn list_all_unsorted(&self) -> GalleryResult<Vec<UnsortedFile>> {
        unsorted::list_all_unsorted(&self.unsorted_root)
    }

    /// Portrayals from the whole gallery matching `options`
    pub fn bundle(&self, options: &FilterOptions) -> GalleryResult<Vec<Portrayal>> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        Ok(bundle::filter_bundle(&self.all_portrayals()?, options))
    }

    pub fn filter_bundle(&self, portrayals: &[Portrayal], options: &FilterOptions) -> Vec<Portrayal> {
        bundle::filter_bundle(portrayals, options)
    }

    pub fn classify(&self, extension: &str) -> GalleryResult<MediaKind> {
        kind::classify(extension)
    }

    /// Tags encoded in a portrayal filename such as `3_ab.jpg`
    pub fn decode_tags(&self, file_name: &str) -> GalleryResult<Vec<Tag>> {
        Ok(codec::decode_filename(file_name, self.tags())?.tags)
    }

    // ========== Mutation ==========

    /// Promote a staged file into `persona`
    pub fn create_portrayal(
        &self,
        persona: &Persona,
        tags: &[Tag],
        source: &Path,
    ) -> GalleryResult<Portrayal> {
        self.factory.create_portrayal(persona, tags, source)
    }

    /// Same as `create_portrayal`, with tags given as their characters
    pub fn create_portrayal_from_keys(
        &self,
        persona: &Persona,
        tag_keys: &str,
        source: &Path,
    ) -> GalleryResult<Portrayal> {
        let tags = self.tags().decode_all(tag_keys)?;
        self.create_portrayal(persona, &tags, source)
    }

    // ========== Background variants ==========

    pub async fn list_all_unsorted_async(&self) -> GalleryResult<Vec<UnsortedFile>> {
        unsorted::list_all_unsorted_async(self.unsorted_root.clone()).await
    }

    pub async fn all_portrayals_async(&self) -> GalleryResult<Vec<Portrayal>> {
        let gallery = self.gallery.clone();
        task::spawn_blocking(move || gallery.all_portrayals()).await?
    }

    /// Run `create_portrayal` on the blocking pool
    pub async fn create_portrayal_async(
        &self,
        persona: Persona,
        tags: Vec<Tag>,
        source: PathBuf,
    ) -> GalleryResult<Portrayal> {
        let factory = Arc::clone(&self.factory);
        task::spawn_blocking(move || factory.create_portrayal(&persona, &tags, &source)).await?
    }
}
