/// Browsing session
///
/// Holds what a front end has selected: the working mode, the selected tags
/// and the persona filters. Passed explicitly into queries instead of living
/// in process-wide state.

use std::fmt;
use std::path::Path;

use crate::error::{GalleryError, GalleryResult};
use crate::media::tags::{Tag, TagRegistry};
use crate::state::bundle::FilterOptions;
use crate::state::entity::Entity;
use crate::state::gallery::{Persona, Portrayal};
use crate::state::library::Library;
use crate::state::unsorted::UnsortedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Staged files are shown and can be filed into personas
    #[default]
    Sorting,
    /// Gallery portrayals are shown through the current filters
    Filtering,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sorting => f.write_str("sorting"),
            Mode::Filtering => f.write_str("filtering"),
        }
    }
}

/// What the current mode shows
#[derive(Debug, Clone)]
pub enum View {
    Unsorted(Vec<UnsortedFile>),
    Bundle(Vec<Portrayal>),
}

impl View {
    pub fn len(&self) -> usize {
        match self {
            View::Unsorted(files) => files.len(),
            View::Bundle(portrayals) => portrayals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: Mode,
    selected_tags: Vec<Tag>,
    selected_personas: Vec<Persona>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch between sorting and filtering, returning the new mode
    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Sorting => Mode::Filtering,
            Mode::Filtering => Mode::Sorting,
        };
        tracing::debug!(mode = %self.mode, "switched mode");
        self.mode
    }

    pub fn selected_tags(&self) -> &[Tag] {
        &self.selected_tags
    }

    /// Select an unselected tag or unselect a selected one.
    /// Returns whether the tag is selected afterwards.
    pub fn toggle_tag(&mut self, tag: Tag) -> bool {
        if let Some(pos) = self.selected_tags.iter().position(|t| *t == tag) {
            self.selected_tags.remove(pos);
            false
        } else {
            self.selected_tags.push(tag);
            true
        }
    }

    pub fn selected_personas(&self) -> &[Persona] {
        &self.selected_personas
    }

    /// Returns false if the persona was already a filter
    pub fn add_persona_filter(&mut self, persona: Persona) -> bool {
        if self.selected_personas.contains(&persona) {
            return false;
        }
        self.selected_personas.push(persona);
        true
    }

    pub fn remove_persona_filter(&mut self, persona: &Persona) -> bool {
        let before = self.selected_personas.len();
        self.selected_personas.retain(|p| p != persona);
        self.selected_personas.len() != before
    }

    pub fn clear_filters(&mut self) {
        self.selected_tags.clear();
        self.selected_personas.clear();
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::new()
            .with_personas(self.selected_personas.iter().cloned())
            .with_tags(self.selected_tags.iter().copied())
    }

    /// Staged files while sorting, the filtered bundle while filtering
    pub fn current_view(&self, library: &Library) -> GalleryResult<View> {
        match self.mode {
            Mode::Sorting => Ok(View::Unsorted(library.list_all_unsorted()?)),
            Mode::Filtering => Ok(View::Bundle(library.bundle(&self.filter_options())?)),
        }
    }

    /// File `source` into `persona` tagged with the selected tags
    pub fn create_from_selection(
        &self,
        library: &Library,
        persona: &Persona,
        source: &Path,
    ) -> GalleryResult<Portrayal> {
        if self.mode != Mode::Sorting {
            return Err(GalleryError::WrongMode {
                expected: Mode::Sorting,
                actual: self.mode,
            });
        }
        library.create_portrayal(persona, &self.selected_tags, source)
    }

    /// One line per active filter, for display
    pub fn describe_filters(&self, registry: &TagRegistry) -> Vec<String> {
        let tags = self
            .selected_tags
            .iter()
            .map(|tag| format!("Tag filter: {}", registry.label(*tag)));
        let personas = self
            .selected_personas
            .iter()
            .map(|p| format!("Persona filter: {} from {}", p.name(), p.origin().name()));
        tags.chain(personas).collect()
    }
}
