/// Path codec
///
/// Packs a portrayal's identity and classification into the filesystem:
///
/// ```text
/// <gallery-root>/<origin>/<persona>/<index>_<tagChars><.ext>
/// ```
///
/// Tag keys are single characters and are concatenated without separators,
/// so the tag run decodes one character at a time.

use std::path::{Component, Path, PathBuf};

use crate::error::{GalleryError, GalleryResult};
use crate::media::tags::{Tag, TagRegistry};

/// Separates the index from the tag run in a filename stem
pub const INDEX_DELIMITER: char = '_';

/// Prefix of the temporary name a file carries while the factory moves it
pub const IN_FLIGHT_PREFIX: &str = "gallery-tmp-";

/// Whether a name is a factory temporary rather than an encoded portrayal
pub fn is_in_flight(name: &str) -> bool {
    name.starts_with(IN_FLIGHT_PREFIX)
}

/// Metadata decoded from a portrayal filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub index: u64,
    /// Tags in the order they were written, duplicates preserved
    pub tags: Vec<Tag>,
    /// Extension without the leading dot (empty if the file has none)
    pub extension: String,
}

/// Build `<index>_<tagChars><.ext>`
///
/// `extension` may be given with or without its leading dot.
pub fn encode_filename(index: u64, tags: &[Tag], extension: &str) -> String {
    let tag_run: String = tags.iter().map(|t| t.as_char()).collect();
    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        format!("{}{}{}", index, INDEX_DELIMITER, tag_run)
    } else {
        format!("{}{}{}.{}", index, INDEX_DELIMITER, tag_run, ext)
    }
}

/// Split a filename into `(stem, extension)`, extension without the dot
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos + 1..]),
        _ => (name, ""),
    }
}

/// Decode only the leading index of a filename
///
/// The index is the full run of characters before the first `_` (or before
/// the extension when there is no delimiter) and must be all ASCII digits.
pub fn decode_index(name: &str) -> GalleryResult<u64> {
    let (stem, _) = split_extension(name);
    let segment = match stem.split_once(INDEX_DELIMITER) {
        Some((head, _)) => head,
        None => stem,
    };
    parse_index(name, segment)
}

fn parse_index(name: &str, segment: &str) -> GalleryResult<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GalleryError::malformed_name(
            name,
            format!("leading segment '{}' is not a non-negative integer", segment),
        ));
    }
    segment
        .parse::<u64>()
        .map_err(|e| GalleryError::malformed_name(name, e.to_string()))
}

/// Decode a full portrayal filename into its index, tags and extension
///
/// Any unknown tag character aborts the whole decode.
pub fn decode_filename(name: &str, registry: &TagRegistry) -> GalleryResult<DecodedName> {
    let (stem, extension) = split_extension(name);
    let (head, tag_run) = stem.split_once(INDEX_DELIMITER).ok_or_else(|| {
        GalleryError::malformed_name(name, format!("missing '{}' delimiter", INDEX_DELIMITER))
    })?;
    let index = parse_index(name, head)?;
    let tags = registry.decode_all(tag_run)?;
    Ok(DecodedName {
        index,
        tags,
        extension: extension.to_string(),
    })
}

/// Locate the filename encoding `index` among candidates
///
/// Compares the decoded leading segment for equality, so index 1 never
/// matches `10_a.jpg`. Names without a numeric leading segment, including
/// in-flight temporaries, are skipped.
/// The first match in iteration order wins.
pub fn find_by_index<'a, I>(index: u64, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .find(|name| matches!(decode_index(name), Ok(found) if found == index))
}

/// Check that a name can be used as a single directory level
fn validate_segment(name: &str) -> GalleryResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(GalleryError::malformed_name(
            name,
            "not a single directory name",
        )),
    }
}

/// Build `<gallery-root>/<origin>/<persona>`
pub fn encode_persona_path(gallery_root: &Path, origin: &str, persona: &str) -> GalleryResult<PathBuf> {
    validate_segment(origin)?;
    validate_segment(persona)?;
    Ok(gallery_root.join(origin).join(persona))
}

/// Recover `(origin, persona)` from a directory two levels below the root
pub fn decode_persona_path(gallery_root: &Path, path: &Path) -> Option<(String, String)> {
    let relative = path.strip_prefix(gallery_root).ok()?;
    let mut parts = relative.components();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Component::Normal(origin)), Some(Component::Normal(persona)), None) => Some((
            origin.to_string_lossy().to_string(),
            persona.to_string_lossy().to_string(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TagRegistry {
        TagRegistry::from_labels([("a", "A"), ("b", "B"), ("c", "C"), ("x", "X")]).unwrap()
    }

    fn tags(registry: &TagRegistry, run: &str) -> Vec<Tag> {
        registry.decode_all(run).unwrap()
    }

    #[test]
    fn test_encode_filename() {
        let reg = registry();
        assert_eq!(encode_filename(2, &tags(&reg, "x"), "mp4"), "2_x.mp4");
        assert_eq!(encode_filename(0, &tags(&reg, "ab"), ".jpg"), "0_ab.jpg");
        assert_eq!(encode_filename(7, &[], "png"), "7_.png");
        assert_eq!(encode_filename(3, &tags(&reg, "c"), ""), "3_c");
    }

    #[test]
    fn test_roundtrip_preserves_order_and_duplicates() {
        let reg = registry();
        let cases = [(0u64, "", "jpg"), (1, "ba", "png"), (42, "aaxa", "webm"), (10, "c", "")];
        for (index, run, ext) in cases {
            let name = encode_filename(index, &tags(&reg, run), ext);
            let decoded = decode_filename(&name, &reg).unwrap();
            assert_eq!(decoded.index, index);
            assert_eq!(decoded.tags, tags(&reg, run));
            assert_eq!(decoded.extension, ext);
        }
    }

    #[test]
    fn test_decode_non_numeric_index_fails() {
        let reg = registry();
        for name in ["abc_a.jpg", "_a.jpg", "-1_a.jpg", "+1_a.jpg", "1x_a.jpg"] {
            assert!(
                matches!(decode_filename(name, &reg), Err(GalleryError::MalformedName { .. })),
                "{} should be malformed",
                name
            );
        }
    }

    #[test]
    fn test_decode_missing_delimiter_fails() {
        let reg = registry();
        assert!(matches!(
            decode_filename("12.jpg", &reg),
            Err(GalleryError::MalformedName { .. })
        ));
        // The bare index is still recoverable for lookups
        assert_eq!(decode_index("12.jpg").unwrap(), 12);
    }

    #[test]
    fn test_decode_unknown_tag_aborts() {
        let reg = registry();
        assert!(matches!(
            decode_filename("3_abz.png", &reg),
            Err(GalleryError::InvalidTag('z'))
        ));
        // A second delimiter is not a tag either
        assert!(matches!(
            decode_filename("3_a_b.png", &reg),
            Err(GalleryError::InvalidTag('_'))
        ));
    }

    #[test]
    fn test_find_by_index_is_exact() {
        let names = ["10_a.jpg", "1_b.png", "100_.gif"];
        assert_eq!(find_by_index(1, names), Some("1_b.png"));
        assert_eq!(find_by_index(10, names), Some("10_a.jpg"));
        assert_eq!(find_by_index(100, names), Some("100_.gif"));
        assert_eq!(find_by_index(2, names), None);
    }

    #[test]
    fn test_find_by_index_skips_junk() {
        let names = ["notes.txt", "3_a.jpg"];
        assert_eq!(find_by_index(3, names), Some("3_a.jpg"));
    }

    #[test]
    fn test_persona_path_roundtrip() {
        let root = Path::new("/gallery");
        let path = encode_persona_path(root, "films", "alice").unwrap();
        assert_eq!(path, PathBuf::from("/gallery/films/alice"));
        assert_eq!(
            decode_persona_path(root, &path),
            Some(("films".to_string(), "alice".to_string()))
        );
        assert_eq!(decode_persona_path(root, Path::new("/gallery/films")), None);
        assert_eq!(decode_persona_path(root, Path::new("/elsewhere/a/b")), None);
    }

    #[test]
    fn test_persona_path_rejects_traversal() {
        let root = Path::new("/gallery");
        assert!(encode_persona_path(root, "..", "alice").is_err());
        assert!(encode_persona_path(root, "films", "a/b").is_err());
        assert!(encode_persona_path(root, "", "alice").is_err());
    }
}
