/// Hierarchy accessors
///
/// Read-only views over the gallery tree. Origins and personas are
/// directories; a portrayal is a single file whose name carries its index
/// and tags. Nothing here writes to disk.

use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::{self, DecodedName};
use crate::error::{EntityKind, GalleryError, GalleryResult};
use crate::media::kind::{self, MediaKind};
use crate::media::tags::{Tag, TagRegistry};
use crate::state::entity::{Entity, FileEntity};

/// One directory entry, with symlinks resolved for the directory check
struct Child {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// List a directory, ordered by name
fn read_children(dir: &Path) -> GalleryResult<Vec<Child>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| GalleryError::io(dir, e))? {
        let entry = entry.map_err(|e| GalleryError::io(dir, e))?;
        let path = entry.path();
        children.push(Child {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir: path.is_dir(),
            path,
        });
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

/// Children that must all be directories (gallery root and origins)
fn read_directory_children(dir: &Path, level: &str) -> GalleryResult<Vec<Child>> {
    let children = read_children(dir)?;
    if let Some(stray) = children.iter().find(|c| !c.is_dir) {
        tracing::warn!(path = %stray.path.display(), "loose file where only {} directories belong", level);
        return Err(GalleryError::MalformedLayout {
            path: stray.path.clone(),
            reason: format!("expected only {} directories here", level),
        });
    }
    Ok(children)
}

/// The root of the classified media tree
#[derive(Debug, Clone)]
pub struct Gallery {
    root: PathBuf,
    tags: Arc<TagRegistry>,
}

impl Gallery {
    pub fn new(root: impl Into<PathBuf>, tags: Arc<TagRegistry>) -> Self {
        Self {
            root: root.into(),
            tags,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tags(&self) -> &Arc<TagRegistry> {
        &self.tags
    }

    /// One origin per direct subdirectory of the gallery root
    pub fn list_origins(&self) -> GalleryResult<Vec<Origin>> {
        Ok(read_directory_children(&self.root, "origin")?
            .into_iter()
            .map(|c| Origin {
                path: c.path,
                tags: Arc::clone(&self.tags),
            })
            .collect())
    }

    /// Exact name match against the gallery root's children
    pub fn find_origin(&self, name: &str) -> GalleryResult<Option<Origin>> {
        tracing::debug!(origin = name, "finding origin");
        Ok(self
            .list_origins()?
            .into_iter()
            .find(|origin| origin.name() == name))
    }

    /// Shortcut for `find_origin(origin)?.find_persona(persona)`
    pub fn find_persona(&self, origin: &str, persona: &str) -> GalleryResult<Option<Persona>> {
        match self.find_origin(origin)? {
            Some(found) => found.find_persona(persona),
            None => Ok(None),
        }
    }

    /// Resolve a persona directory back into a handle
    pub fn persona_at(&self, path: &Path) -> Option<Persona> {
        let (origin, persona) = codec::decode_persona_path(&self.root, path)?;
        let path = codec::encode_persona_path(&self.root, &origin, &persona).ok()?;
        path.is_dir().then(|| Persona {
            path,
            tags: Arc::clone(&self.tags),
        })
    }

    /// Every portrayal of every persona of every origin
    pub fn all_portrayals(&self) -> GalleryResult<Vec<Portrayal>> {
        let mut all = Vec::new();
        for origin in self.list_origins()? {
            for persona in origin.list_personas()? {
                all.extend(persona.list_portrayals()?);
            }
        }
        Ok(all)
    }
}

/// Top-level grouping directory, curated outside the application
#[derive(Debug, Clone)]
pub struct Origin {
    path: PathBuf,
    tags: Arc<TagRegistry>,
}

impl Origin {
    pub fn list_personas(&self) -> GalleryResult<Vec<Persona>> {
        Ok(read_directory_children(&self.path, "persona")?
            .into_iter()
            .map(|c| Persona {
                path: c.path,
                tags: Arc::clone(&self.tags),
            })
            .collect())
    }

    pub fn find_persona(&self, name: &str) -> GalleryResult<Option<Persona>> {
        tracing::debug!(origin = %self.name(), persona = name, "finding persona");
        Ok(self
            .list_personas()?
            .into_iter()
            .find(|persona| persona.name() == name))
    }

    pub fn persona_count(&self) -> GalleryResult<usize> {
        Ok(self.list_personas()?.len())
    }
}

impl PartialEq for Origin {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Origin {}

impl Entity for Origin {
    const KIND: EntityKind = EntityKind::Origin;

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Second-level directory holding portrayals
#[derive(Debug, Clone)]
pub struct Persona {
    path: PathBuf,
    tags: Arc<TagRegistry>,
}

impl Persona {
    /// The origin this persona is filed under
    pub fn origin(&self) -> Origin {
        Origin {
            path: self.path.parent().map(Path::to_path_buf).unwrap_or_default(),
            tags: Arc::clone(&self.tags),
        }
    }

    /// Every file in the persona directory, decoded, ordered by index
    ///
    /// A file whose name does not decode fails the whole listing.
    pub fn list_portrayals(&self) -> GalleryResult<Vec<Portrayal>> {
        let mut portrayals = Vec::new();
        for child in read_children(&self.path)? {
            if child.is_dir {
                tracing::warn!(path = %child.path.display(), "ignoring directory inside persona");
                continue;
            }
            if codec::is_in_flight(&child.name) {
                tracing::debug!(path = %child.path.display(), "skipping file still being moved in");
                continue;
            }
            portrayals.push(Portrayal::from_file(child.path, &child.name, &self.tags)?);
        }
        portrayals.sort_by_key(|p| p.index);
        if let Some(pair) = portrayals.windows(2).find(|w| w[0].index == w[1].index) {
            return Err(GalleryError::MalformedLayout {
                path: pair[1].path.clone(),
                reason: format!("index {} appears more than once", pair[1].index),
            });
        }
        Ok(portrayals)
    }

    /// Look up a portrayal by its exact index
    pub fn find_portrayal(&self, index: u64) -> GalleryResult<Option<Portrayal>> {
        let children = read_children(&self.path)?;
        let names = children.iter().filter(|c| !c.is_dir).map(|c| c.name.as_str());
        match codec::find_by_index(index, names) {
            Some(name) => {
                let path = self.path.join(name);
                Portrayal::from_file(path, name, &self.tags).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn portrayal_count(&self) -> GalleryResult<usize> {
        Ok(self.list_portrayals()?.len())
    }
}

impl PartialEq for Persona {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Persona {}

impl Hash for Persona {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl Entity for Persona {
    const KIND: EntityKind = EntityKind::Persona;

    fn path(&self) -> &Path {
        &self.path
    }
}

/// A single classified media file
#[derive(Debug, Clone)]
pub struct Portrayal {
    path: PathBuf,
    index: u64,
    tags: Vec<Tag>,
    extension: String,
    registry: Arc<TagRegistry>,
}

impl Portrayal {
    fn from_file(path: PathBuf, name: &str, registry: &Arc<TagRegistry>) -> GalleryResult<Self> {
        let DecodedName {
            index,
            tags,
            extension,
        } = codec::decode_filename(name, registry)?;
        Ok(Self {
            path,
            index,
            tags,
            extension,
            registry: Arc::clone(registry),
        })
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Tags in the order they were assigned at creation
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn media_kind(&self) -> GalleryResult<MediaKind> {
        kind::classify(&self.extension)
    }

    /// The persona directory holding this file
    pub fn persona(&self) -> Persona {
        Persona {
            path: self.path.parent().map(Path::to_path_buf).unwrap_or_default(),
            tags: Arc::clone(&self.registry),
        }
    }

    pub fn file_name(&self) -> String {
        self.name()
    }
}

impl PartialEq for Portrayal {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Portrayal {}

impl Entity for Portrayal {
    const KIND: EntityKind = EntityKind::Portrayal;

    fn path(&self) -> &Path {
        &self.path
    }
}

impl FileEntity for Portrayal {}
