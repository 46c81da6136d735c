//! # Layout Composition Engine
//!
//! A page layout is a set of [`LayoutBlock`]s distributed over named sections. The
//! engine keeps three pieces of state in a [`LayoutModel`]:
//!
//! - the **section order**: display order of the sections, reserved ones included;
//! - the **section registry**: declared content type per section ([`registry`]);
//! - the **blocks**, keyed by id. Each block carries its section and its position
//!   inside that section.
//!
//! ## Snapshots, not state
//!
//! Every operation borrows the model and returns a new one. Nothing is mutated in
//! place, so a caller can compute alternative edits against the same snapshot and
//! pick which one to keep. Expected domain conditions (dropping a field on a
//! related-list section, creating a duplicate section) come back as a
//! [`Rejection`]; the original model is untouched in that case.
//!
//! ## Invariants
//!
//! After every successful operation:
//! - block orders inside each section are dense: `0..n-1`, no gaps, no duplicates;
//! - every block's kind is accepted by its section's type. Buttons only live in the
//!   `header` pseudo-section, which is never part of the section order;
//! - section names are unique after normalization (trimmed, lower-cased), and
//!   `details` / `related_lists` always exist.
//!
//! The operations are split by concern: [`blocks`] (add, move, remove, edit),
//! [`sections`] (create, rename, remove, reorder, type derivation), [`snapshot`]
//! (wire format) and [`reducer`] (command dispatch for UI clients).

use crate::model::{
    is_reserved_section, normalize_section_name, BlockKind, CatalogEntry, LayoutBlock,
    SectionType, HEADER_SECTION, RESERVED_SECTIONS,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use uuid::Uuid;

pub mod blocks;
pub mod reducer;
pub mod registry;
pub mod sections;
pub mod snapshot;

pub use reducer::{reduce, LayoutCommand, Transition};
pub use registry::SectionTypeRegistry;
pub use sections::Direction;
pub use snapshot::{BlockRecord, LayoutSnapshot, SectionRecord};

/// Why a layout operation refused to apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{kind} blocks cannot be placed in the '{section}' section")]
    IncompatibleSectionType { kind: BlockKind, section: String },

    #[error("'{0}' is a system section")]
    ReservedSectionViolation(String),

    #[error("Section '{0}' already exists")]
    DuplicateSectionName(String),

    #[error("Section '{0}' does not exist")]
    SectionNotFound(String),

    #[error("Block {0} does not exist")]
    BlockNotFound(Uuid),

    #[error("Invalid section name: {0:?}")]
    InvalidSectionName(String),
}

pub type Outcome<T> = std::result::Result<T, Rejection>;

/// Read-only view of a section, as presented to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub section_type: SectionType,
    pub is_reserved: bool,
    pub block_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutModel {
    pub(crate) section_order: Vec<String>,
    pub(crate) registry: SectionTypeRegistry,
    pub(crate) blocks: BTreeMap<Uuid, LayoutBlock>,
}

impl Default for LayoutModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutModel {
    /// An empty layout with only the reserved sections.
    pub fn new() -> Self {
        Self {
            section_order: RESERVED_SECTIONS.iter().map(|s| s.to_string()).collect(),
            registry: SectionTypeRegistry::with_reserved(),
            blocks: BTreeMap::new(),
        }
    }

    pub fn section_order(&self) -> &[String] {
        &self.section_order
    }

    pub fn registry(&self) -> &SectionTypeRegistry {
        &self.registry
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.registry.contains(&normalize_section_name(name))
    }

    pub fn block(&self, id: &Uuid) -> Option<&LayoutBlock> {
        self.blocks.get(id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &LayoutBlock> {
        self.blocks.values()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks of one section in display order.
    pub fn blocks_in(&self, section: &str) -> Vec<&LayoutBlock> {
        let section = normalize_section_name(section);
        let mut blocks: Vec<&LayoutBlock> = self
            .blocks
            .values()
            .filter(|b| b.section == section)
            .collect();
        blocks.sort_by_key(|b| (b.order, b.id));
        blocks
    }

    pub fn buttons(&self) -> Vec<&LayoutBlock> {
        self.blocks_in(HEADER_SECTION)
    }

    pub fn section(&self, name: &str) -> Option<Section> {
        let name = normalize_section_name(name);
        if !self.registry.contains(&name) {
            return None;
        }
        Some(Section {
            section_type: self.derive_section_type(&name),
            is_reserved: is_reserved_section(&name),
            block_count: self.blocks.values().filter(|b| b.section == name).count(),
            name,
        })
    }

    /// All sections in display order.
    pub fn sections(&self) -> Vec<Section> {
        self.section_order
            .iter()
            .filter_map(|name| self.section(name))
            .collect()
    }

    /// Reference ids of every placed block of `kind`.
    pub fn placed_references(&self, kind: BlockKind) -> BTreeSet<&str> {
        self.blocks
            .values()
            .filter(|b| b.kind() == kind)
            .map(|b| b.reference_id())
            .collect()
    }

    /// Catalog entries not yet on the layout, in catalog order. This is the palette
    /// the editor offers for dragging.
    pub fn unplaced<'a>(&self, catalog: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        catalog
            .iter()
            .filter(|entry| {
                !self
                    .blocks
                    .values()
                    .any(|b| b.kind() == entry.kind && b.reference_id() == entry.id)
            })
            .collect()
    }

    /// Lists every broken invariant. An empty list means the model is consistent.
    ///
    /// Models produced by the engine's operations are always consistent; hydrated
    /// snapshots may not be, since persisted data predates some of the rules.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut by_section: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for block in self.blocks.values() {
            by_section
                .entry(block.section.as_str())
                .or_default()
                .push(block.order);
        }
        for (section, mut orders) in by_section {
            orders.sort_unstable();
            if orders.iter().enumerate().any(|(i, order)| i != *order) {
                problems.push(format!(
                    "Section '{}' has non-dense block order {:?}",
                    section, orders
                ));
            }
        }

        for block in self.blocks.values() {
            if let Err(rejection) = self.ensure_accepts(&block.section, block.kind()) {
                problems.push(format!("Block {} ({}): {}", block.id, block.label, rejection));
            }
        }

        for name in self.registry.names() {
            if !self.section_order.iter().any(|s| s == name) {
                problems.push(format!("Section '{}' is missing from the section order", name));
            }
        }
        for reserved in RESERVED_SECTIONS {
            if !self.registry.contains(reserved) {
                problems.push(format!("Reserved section '{}' is missing", reserved));
            }
        }

        problems
    }

    /// Checks that `section` exists and accepts blocks of `kind`.
    pub(crate) fn ensure_accepts(&self, section: &str, kind: BlockKind) -> Outcome<()> {
        let accepted = if section == HEADER_SECTION {
            kind == BlockKind::Button
        } else if self.registry.contains(section) {
            self.derive_section_type(section).accepts(kind)
        } else {
            return Err(Rejection::SectionNotFound(section.to_string()));
        };

        if accepted {
            Ok(())
        } else {
            Err(Rejection::IncompatibleSectionType {
                kind,
                section: section.to_string(),
            })
        }
    }

    /// Renumbers the blocks of `section` to `0..n-1`, keeping their relative order.
    pub(crate) fn densify(&mut self, section: &str) {
        let ordered: Vec<Uuid> = self.blocks_in(section).iter().map(|b| b.id).collect();
        self.renumber(&ordered);
    }

    /// Assigns `order = position` to each id in `ordered`.
    pub(crate) fn renumber(&mut self, ordered: &[Uuid]) {
        for (position, id) in ordered.iter().enumerate() {
            if let Some(block) = self.blocks.get_mut(id) {
                block.order = position;
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_layout;
    use super::*;

    #[test]
    fn new_model_has_reserved_sections_only() {
        let model = LayoutModel::new();
        assert_eq!(model.section_order(), ["details", "related_lists"]);
        assert_eq!(model.block_count(), 0);
        assert!(model.check_invariants().is_empty());
    }

    #[test]
    fn sections_view_reports_types_and_counts() {
        let model = sample_layout();
        let sections = model.sections();
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["details", "related_lists", "extras"]);
        assert_eq!(sections[0].block_count, 2);
        assert!(sections[0].is_reserved);
        assert_eq!(sections[2].section_type, SectionType::Mixed);
        assert!(!sections[2].is_reserved);
    }

    #[test]
    fn section_lookup_is_case_insensitive() {
        let model = sample_layout();
        assert!(model.has_section(" EXTRAS"));
        assert_eq!(model.blocks_in("Details").len(), 2);
        assert!(model.section("missing").is_none());
    }

    #[test]
    fn placed_references_by_kind() {
        let model = sample_layout();
        let fields = model.placed_references(BlockKind::Field);
        assert!(fields.contains("f-name"));
        assert!(fields.contains("f-email"));
        assert_eq!(model.placed_references(BlockKind::Button).len(), 1);
    }

    #[test]
    fn unplaced_entries_form_the_palette() {
        let model = sample_layout();
        let catalog: Vec<CatalogEntry> = serde_json::from_str(
            r#"[
                {"id": "f-name", "display_name": "Name", "kind": "field"},
                {"id": "f-phone", "display_name": "Phone", "kind": "field"},
                {"id": "rl-contacts", "display_name": "Contacts", "kind": "related_list"},
                {"id": "b-print", "display_name": "Print", "kind": "button"},
                {"id": "b-clone", "display_name": "Clone", "kind": "button"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<&str> = model.unplaced(&catalog).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["f-phone", "b-clone"]);
    }

    #[test]
    fn invariant_checker_flags_gaps_and_misplacement() {
        let mut model = sample_layout();
        let ids: Vec<Uuid> = model.blocks_in("details").iter().map(|b| b.id).collect();
        model.blocks.get_mut(&ids[1]).unwrap().order = 5;
        let rl = super::fixtures::id_of(&model, "rl-contacts");
        model.blocks.get_mut(&rl).unwrap().section = "details".into();

        let problems = model.check_invariants();
        assert!(problems.iter().any(|p| p.contains("non-dense")));
        assert!(problems.iter().any(|p| p.contains("cannot be placed")));
    }
}
