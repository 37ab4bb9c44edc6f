/// State management module
///
/// This module handles everything that reads or writes the media tree:
/// - Read-only capability shared by gallery entities (entity.rs)
/// - Origin / persona / portrayal accessors (gallery.rs)
/// - Staging area scanning (unsorted.rs)
/// - Promotion of staged files into personas (factory.rs)
/// - Persona/tag filtering (bundle.rs)
/// - The library facade (library.rs)
/// - Per-front-end selection and mode (session.rs)

pub mod bundle;
pub mod entity;
pub mod factory;
pub mod gallery;
pub mod library;
pub mod session;
pub mod unsorted;
