//! Section type registry.
//!
//! The registry is the authoritative source of placement constraints: it maps every
//! known section name to the content type it was declared with. Sections hydrated
//! from a block list written before types were tracked have no declared type; their
//! type is inferred from the blocks they hold (see [`infer_section_type`]).

use crate::model::{BlockKind, SectionType, DETAILS_SECTION, RELATED_LISTS_SECTION};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTypeRegistry {
    entries: BTreeMap<String, Option<SectionType>>,
}

impl Default for SectionTypeRegistry {
    fn default() -> Self {
        Self::with_reserved()
    }
}

impl SectionTypeRegistry {
    /// A registry holding only the two system sections.
    pub fn with_reserved() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(DETAILS_SECTION.to_string(), Some(SectionType::Field));
        entries.insert(
            RELATED_LISTS_SECTION.to_string(),
            Some(SectionType::RelatedList),
        );
        Self { entries }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The explicitly stored type, if any.
    pub fn declared(&self, name: &str) -> Option<SectionType> {
        self.entries.get(name).copied().flatten()
    }

    pub fn register(&mut self, name: impl Into<String>, section_type: Option<SectionType>) {
        self.entries.insert(name.into(), section_type);
    }

    /// Moves the entry to `new_name`, keeping its declared type as-is.
    pub fn rename(&mut self, old_name: &str, new_name: impl Into<String>) -> bool {
        match self.entries.remove(old_name) {
            Some(section_type) => {
                self.entries.insert(new_name.into(), section_type);
                true
            }
            None => false,
        }
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Infers a section type from the kinds of blocks it currently holds.
///
/// Empty sections (and sections holding only buttons) fall back to `Field`.
pub fn infer_section_type<I>(kinds: I) -> SectionType
where
    I: IntoIterator<Item = BlockKind>,
{
    let mut has_fields = false;
    let mut has_related_lists = false;
    for kind in kinds {
        match kind {
            BlockKind::Field => has_fields = true,
            BlockKind::RelatedList => has_related_lists = true,
            BlockKind::Button => {}
        }
    }

    match (has_fields, has_related_lists) {
        (true, true) => SectionType::Mixed,
        (false, true) => SectionType::RelatedList,
        _ => SectionType::Field,
    }
}
