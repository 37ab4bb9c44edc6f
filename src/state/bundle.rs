/// Bundle filter
///
/// Selects portrayals matching any of the chosen personas or any of the
/// chosen tags. An empty selection matches nothing.

use crate::media::tags::Tag;
use crate::state::gallery::{Persona, Portrayal};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub by_personas: Vec<Persona>,
    pub by_tags: Vec<Tag>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_personas(mut self, personas: impl IntoIterator<Item = Persona>) -> Self {
        self.by_personas.extend(personas);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.by_tags.extend(tags);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.by_personas.is_empty() && self.by_tags.is_empty()
    }

    /// Whether a portrayal satisfies at least one criterion
    pub fn matches(&self, portrayal: &Portrayal) -> bool {
        let by_persona = !self.by_personas.is_empty() && {
            let owner = portrayal.persona();
            self.by_personas.iter().any(|p| *p == owner)
        };
        by_persona
            || (!self.by_tags.is_empty() && self.by_tags.iter().any(|t| portrayal.has_tag(*t)))
    }
}

/// Keep the portrayals matching `options`, preserving input order
pub fn filter_bundle(portrayals: &[Portrayal], options: &FilterOptions) -> Vec<Portrayal> {
    if options.is_empty() {
        return Vec::new();
    }
    portrayals
        .iter()
        .filter(|p| options.matches(p))
        .cloned()
        .collect()
}
