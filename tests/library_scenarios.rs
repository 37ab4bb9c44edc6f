use persona_gallery::{
    classify, Config, Entity, EntityKind, FilterOptions, GalleryError, Library, MediaKind,
};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

struct Scene {
    _dir: tempfile::TempDir,
    gallery: PathBuf,
    unsorted: PathBuf,
    library: Library,
}

fn scene() -> Scene {
    let dir = tempfile::tempdir().expect("temp library root");
    let gallery = dir.path().join("gallery");
    let unsorted = dir.path().join("unsorted");
    let alice = gallery.join("films").join("alice");
    fs::create_dir_all(&alice).unwrap();
    fs::create_dir_all(gallery.join("films").join("bob")).unwrap();
    fs::create_dir_all(&unsorted).unwrap();
    fs::write(alice.join("0_ab.jpg"), b"jpg").unwrap();
    fs::write(alice.join("1_c.png"), b"png").unwrap();

    let config = Config::from_json(
        &serde_json::json!({
            "galleryFolder": gallery,
            "unsortedFolder": unsorted,
            "tags": { "a": "Outdoor", "b": "Portrait", "c": "Candid", "x": "Extra" }
        })
        .to_string(),
    )
    .expect("valid config");
    let library = Library::open(&config).expect("library opens");

    Scene {
        _dir: dir,
        gallery,
        unsorted,
        library,
    }
}

fn stage(scene: &Scene, relative: &str, secs_ago: u64) -> PathBuf {
    let path = scene.unsorted.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = File::create(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
        .unwrap();
    path
}

fn tag_chars(tags: &[persona_gallery::Tag]) -> String {
    tags.iter().map(|t| t.as_char()).collect()
}

#[test]
fn alice_lists_two_decoded_portrayals() {
    let scene = scene();
    let alice = scene.library.find_persona("films", "alice").unwrap().unwrap();
    let portrayals = alice.list_portrayals().unwrap();

    assert_eq!(portrayals.len(), 2);
    assert_eq!(portrayals[0].index(), 0);
    assert_eq!(tag_chars(portrayals[0].tags()), "ab");
    assert_eq!(portrayals[1].index(), 1);
    assert_eq!(tag_chars(portrayals[1].tags()), "c");
}

#[test]
fn creating_from_unsorted_appends_next_index() {
    let scene = scene();
    let alice = scene.library.find_persona("films", "alice").unwrap().unwrap();
    let source = stage(&scene, "inbox/foo.mp4", 1);

    let created = scene
        .library
        .create_portrayal_from_keys(&alice, "x", &source)
        .unwrap();

    assert_eq!(created.index(), 2);
    assert_eq!(created.media_kind().unwrap(), MediaKind::Video);
    assert!(scene.gallery.join("films/alice/2_x.mp4").is_file());
    assert!(!source.exists());
    assert_eq!(alice.find_portrayal(2).unwrap(), Some(created));
}

#[test]
fn fresh_persona_numbers_from_zero() {
    let scene = scene();
    let bob = scene.library.find_persona("films", "bob").unwrap().unwrap();
    for expected in 0..3u64 {
        let source = stage(&scene, &format!("{}.webp", expected), 1);
        let created = scene.library.create_portrayal(&bob, &[], &source).unwrap();
        assert_eq!(created.index(), expected);
    }
}

#[test]
fn mutation_stubs_are_forbidden_and_leave_disk_alone() {
    let scene = scene();
    let films = scene.library.find_origin("films").unwrap().unwrap();
    let alice = films.find_persona("alice").unwrap().unwrap();
    let target = scene.gallery.join("elsewhere");

    for result in [
        films.rename("movies"),
        films.move_to(&target),
        films.copy_to(&target),
        films.delete(),
    ] {
        assert!(matches!(
            result,
            Err(GalleryError::ForbiddenOperation { kind: EntityKind::Origin, .. })
        ));
    }
    for result in [
        alice.rename("alicia"),
        alice.move_to(&target),
        alice.copy_to(&target),
        alice.delete(),
    ] {
        assert!(matches!(
            result,
            Err(GalleryError::ForbiddenOperation { kind: EntityKind::Persona, .. })
        ));
    }

    assert!(scene.gallery.join("films/alice/0_ab.jpg").is_file());
    assert!(!target.exists());
    assert_eq!(alice.portrayal_count().unwrap(), 2);
}

#[test]
fn classify_ignores_case() {
    assert_eq!(classify("JPG").unwrap(), MediaKind::Image);
    assert_eq!(classify("jpg").unwrap(), MediaKind::Image);
    assert!(matches!(classify("exe"), Err(GalleryError::UnsupportedMedia(_))));
}

#[test]
fn unsorted_is_ordered_by_modification_time() {
    let scene = scene();
    stage(&scene, "z/late.png", 5);
    stage(&scene, "a/b/early.jpg", 500);
    stage(&scene, "mid.gif", 50);

    let files = scene.library.list_all_unsorted().unwrap();
    let names: Vec<&str> = files
        .iter()
        .map(|f| f.path().file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["early.jpg", "mid.gif", "late.png"]);
}

#[test]
fn empty_filter_returns_nothing() {
    let scene = scene();
    let all = scene.library.all_portrayals().unwrap();
    assert!(!all.is_empty());
    assert!(scene.library.filter_bundle(&all, &FilterOptions::new()).is_empty());
}

#[test]
fn bundle_is_a_subset_matching_some_criterion() {
    let scene = scene();
    let all = scene.library.all_portrayals().unwrap();
    let c = scene.library.tags().decode('c').unwrap();
    let options = FilterOptions::new().with_tags([c]);
    let bundle = scene.library.filter_bundle(&all, &options);

    assert_eq!(bundle.len(), 1);
    assert!(bundle.iter().all(|p| all.contains(p) && p.has_tag(c)));
}

#[test]
fn malformed_entries_surface_as_errors() {
    let scene = scene();
    fs::write(scene.gallery.join("films/alice/cover.jpg"), b"").unwrap();
    fs::write(scene.gallery.join("films/bob/0_q.jpg"), b"").unwrap();

    let alice = scene.library.find_persona("films", "alice").unwrap().unwrap();
    let bob = scene.library.find_persona("films", "bob").unwrap().unwrap();
    assert!(matches!(
        alice.list_portrayals(),
        Err(GalleryError::MalformedName { .. })
    ));
    assert!(matches!(bob.list_portrayals(), Err(GalleryError::InvalidTag('q'))));
    assert!(scene.library.all_portrayals().is_err());
}

#[test]
fn persona_path_decodes_back_to_a_handle() {
    let scene = scene();
    let persona = scene
        .library
        .gallery()
        .persona_at(&scene.gallery.join("films/bob"))
        .unwrap();
    assert_eq!(persona.origin().name(), "films");
    assert_eq!(persona.name(), "bob");
}
