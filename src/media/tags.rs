/// Tag registry
///
/// Maps single-character tag keys to human-readable labels. The registry is
/// built once from configuration and shared read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GalleryError, GalleryResult};

/// A validated tag key
///
/// Only a `TagRegistry` can produce one, so holding a `Tag` proves the
/// character was configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(char);

impl Tag {
    /// The single character this tag is encoded as in filenames
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Characters that would make an encoded filename ambiguous
const RESERVED_KEYS: [char; 2] = ['_', '.'];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    labels: BTreeMap<char, String>,
}

impl TagRegistry {
    /// Build a registry from configured `key -> label` pairs.
    ///
    /// Fails if any key is not exactly one character, uses a reserved
    /// delimiter, or carries an empty label.
    pub fn from_labels<I, K, V>(entries: I) -> GalleryResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut labels = BTreeMap::new();
        for (key, label) in entries {
            let key = key.as_ref();
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(GalleryError::Config(format!(
                        "tag key '{}' must be exactly one character",
                        key
                    )))
                }
            };
            if RESERVED_KEYS.contains(&ch) {
                return Err(GalleryError::Config(format!(
                    "tag key '{}' is reserved by the filename encoding",
                    ch
                )));
            }
            let label = label.into();
            if label.trim().is_empty() {
                return Err(GalleryError::Config(format!("tag '{}' has an empty label", ch)));
            }
            labels.insert(ch, label);
        }
        Ok(Self { labels })
    }

    /// Validate a character against the configured keys
    pub fn decode(&self, ch: char) -> GalleryResult<Tag> {
        if self.labels.contains_key(&ch) {
            Ok(Tag(ch))
        } else {
            Err(GalleryError::InvalidTag(ch))
        }
    }

    /// Decode every character of a tag run, aborting on the first unknown one
    pub fn decode_all(&self, run: &str) -> GalleryResult<Vec<Tag>> {
        run.chars().map(|ch| self.decode(ch)).collect()
    }

    /// Human-readable label for a tag
    pub fn label(&self, tag: Tag) -> &str {
        // A Tag can only come from this registry or an identical clone
        self.labels.get(&tag.0).map(String::as_str).unwrap_or_default()
    }

    /// All configured tags with their labels, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &str)> {
        self.labels.iter().map(|(ch, label)| (Tag(*ch), label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
