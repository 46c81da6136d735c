//! Section lifecycle: create, rename, remove and reorder custom sections.
//!
//! Reserved sections (`details`, `related_lists`) and the `header` pseudo-section are
//! system-owned: they can never be created, renamed, removed or moved. Section display
//! order is kept separately from block order, so reordering sections never touches
//! block positions.

use super::registry::infer_section_type;
use super::{LayoutModel, Outcome, Rejection};
use crate::model::{
    is_reserved_section, normalize_section_name, BlockKind, SectionType, DETAILS_SECTION,
    HEADER_SECTION, RELATED_LISTS_SECTION,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Names users may not claim for their own sections.
fn is_system_name(name: &str) -> bool {
    is_reserved_section(name) || name == HEADER_SECTION
}

impl LayoutModel {
    /// Registers a new, empty section after all existing ones.
    pub fn create_section(&self, name: &str, section_type: SectionType) -> Outcome<LayoutModel> {
        let name = normalize_section_name(name);
        if name.is_empty() {
            return Err(Rejection::InvalidSectionName(name));
        }
        if is_system_name(&name) {
            return Err(Rejection::ReservedSectionViolation(name));
        }
        if self.registry.contains(&name) {
            return Err(Rejection::DuplicateSectionName(name));
        }

        let mut next = self.clone();
        next.section_order.push(name.clone());
        next.registry.register(name.clone(), Some(section_type));
        debug!(section = %name, section_type = %section_type, "section created");
        Ok(next)
    }

    /// Renames a custom section, carrying its declared type and its blocks along.
    pub fn rename_section(&self, old_name: &str, new_name: &str) -> Outcome<LayoutModel> {
        let old_name = normalize_section_name(old_name);
        let new_name = normalize_section_name(new_name);

        if is_system_name(&old_name) {
            return Err(Rejection::ReservedSectionViolation(old_name));
        }
        if !self.registry.contains(&old_name) {
            return Err(Rejection::SectionNotFound(old_name));
        }
        if new_name.is_empty() {
            return Err(Rejection::InvalidSectionName(new_name));
        }
        if is_system_name(&new_name) {
            return Err(Rejection::ReservedSectionViolation(new_name));
        }
        if new_name == old_name {
            return Ok(self.clone());
        }
        if self.registry.contains(&new_name) {
            return Err(Rejection::DuplicateSectionName(new_name));
        }

        let mut next = self.clone();
        for entry in next.section_order.iter_mut() {
            if *entry == old_name {
                *entry = new_name.clone();
            }
        }
        next.registry.rename(&old_name, new_name.clone());
        for block in next.blocks.values_mut() {
            if block.section == old_name {
                block.section = new_name.clone();
            }
        }
        debug!(from = %old_name, to = %new_name, "section renamed");
        Ok(next)
    }

    /// Drops a custom section. Its field blocks move to the end of `details` and its
    /// related lists to the end of `related_lists`, keeping their relative order.
    pub fn remove_section(&self, name: &str) -> Outcome<LayoutModel> {
        let name = normalize_section_name(name);
        if is_system_name(&name) {
            return Err(Rejection::ReservedSectionViolation(name));
        }
        if !self.registry.contains(&name) {
            return Err(Rejection::SectionNotFound(name));
        }

        let mut next = self.clone();
        let orphans: Vec<(Uuid, BlockKind)> = self
            .blocks_in(&name)
            .iter()
            .map(|b| (b.id, b.kind()))
            .collect();

        for (id, kind) in &orphans {
            let destination = match kind {
                BlockKind::RelatedList => RELATED_LISTS_SECTION,
                _ => DETAILS_SECTION,
            };
            let order = next
                .blocks
                .values()
                .filter(|b| b.section == destination)
                .count();
            if let Some(block) = next.blocks.get_mut(id) {
                block.section = destination.to_string();
                block.order = order;
            }
        }
        next.densify(DETAILS_SECTION);
        next.densify(RELATED_LISTS_SECTION);

        next.section_order.retain(|s| *s != name);
        next.registry.unregister(&name);
        debug!(section = %name, migrated = orphans.len(), "section removed");
        Ok(next)
    }

    /// Swaps a custom section with its nearest custom neighbour in `direction`.
    /// Reserved sections stay where they are and are skipped over.
    pub fn reorder_section(&self, name: &str, direction: Direction) -> Outcome<LayoutModel> {
        let name = normalize_section_name(name);
        if is_system_name(&name) {
            return Err(Rejection::ReservedSectionViolation(name));
        }
        let Some(current) = self.section_order.iter().position(|s| *s == name) else {
            return Err(Rejection::SectionNotFound(name));
        };

        let is_custom = |s: &String| !is_reserved_section(s);
        let neighbour = match direction {
            Direction::Up => self.section_order[..current].iter().rposition(is_custom),
            Direction::Down => self.section_order[current + 1..]
                .iter()
                .position(is_custom)
                .map(|offset| current + 1 + offset),
        };

        let mut next = self.clone();
        if let Some(other) = neighbour {
            next.section_order.swap(current, other);
            debug!(section = %name, ?direction, "section reordered");
        }
        Ok(next)
    }

    /// The type governing what `name` accepts: the declared type when one is stored,
    /// otherwise inferred from the blocks currently in the section.
    pub fn derive_section_type(&self, name: &str) -> SectionType {
        let name = normalize_section_name(name);
        self.registry.declared(&name).unwrap_or_else(|| {
            infer_section_type(
                self.blocks
                    .values()
                    .filter(|b| b.section == name)
                    .map(|b| b.kind()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{id_of, sample_layout};
    use super::*;
    use crate::model::BlockDraft;

    fn custom(model: &LayoutModel, names: &[&str]) -> LayoutModel {
        names.iter().fold(model.clone(), |m, name| {
            m.create_section(name, SectionType::Field).unwrap()
        })
    }

    #[test]
    fn create_normalizes_and_appends() {
        let model = LayoutModel::new()
            .create_section("  Billing ", SectionType::Field)
            .unwrap();
        assert_eq!(model.section_order(), ["details", "related_lists", "billing"]);
        assert_eq!(model.derive_section_type("billing"), SectionType::Field);
        assert!(model.blocks_in("billing").is_empty());
    }

    #[test]
    fn create_rejects_duplicates_and_reserved_names() {
        let model = sample_layout();
        assert_eq!(
            model.create_section("EXTRAS", SectionType::Field),
            Err(Rejection::DuplicateSectionName("extras".into()))
        );
        assert_eq!(
            model.create_section("Details", SectionType::Field),
            Err(Rejection::ReservedSectionViolation("details".into()))
        );
        assert_eq!(
            model.create_section("header", SectionType::Mixed),
            Err(Rejection::ReservedSectionViolation("header".into()))
        );
        assert_eq!(
            model.create_section("   ", SectionType::Mixed),
            Err(Rejection::InvalidSectionName(String::new()))
        );
    }

    #[test]
    fn mixed_section_accepts_both_kinds() {
        let model = LayoutModel::new()
            .create_section("extras", SectionType::Mixed)
            .and_then(|m| m.add_block(BlockDraft::field("f-1", "Name"), "extras"))
            .and_then(|m| {
                m.add_block(BlockDraft::related_list("rl-1", "Contacts", vec![]), "extras")
            })
            .unwrap();
        assert_eq!(model.derive_section_type("extras"), SectionType::Mixed);
        assert_eq!(model.blocks_in("extras").len(), 2);
    }

    #[test]
    fn rename_moves_blocks_and_keeps_type() {
        let model = sample_layout()
            .add_block(BlockDraft::field("f-site", "Site"), "extras")
            .unwrap();
        let renamed = model.rename_section("extras", "More Info").unwrap();

        assert_eq!(renamed.section_order(), ["details", "related_lists", "more info"]);
        assert_eq!(renamed.derive_section_type("more info"), SectionType::Mixed);
        assert_eq!(renamed.blocks_in("more info").len(), 1);
        assert!(!renamed.has_section("extras"));
        assert!(renamed.check_invariants().is_empty());
    }

    #[test]
    fn reserved_sections_cannot_be_renamed() {
        let model = sample_layout();
        assert_eq!(
            model.rename_section("details", "info"),
            Err(Rejection::ReservedSectionViolation("details".into()))
        );
        assert_eq!(
            model.rename_section("extras", "related_lists"),
            Err(Rejection::ReservedSectionViolation("related_lists".into()))
        );
    }

    #[test]
    fn rename_edge_cases() {
        let model = custom(&sample_layout(), &["billing"]);
        assert_eq!(
            model.rename_section("extras", "Billing"),
            Err(Rejection::DuplicateSectionName("billing".into()))
        );
        assert_eq!(
            model.rename_section("ghost", "spirit"),
            Err(Rejection::SectionNotFound("ghost".into()))
        );
        assert_eq!(model.rename_section("extras", " EXTRAS "), Ok(model.clone()));
        assert!(matches!(
            model.rename_section("extras", ""),
            Err(Rejection::InvalidSectionName(_))
        ));
    }

    #[test]
    fn remove_migrates_blocks_by_kind() {
        let model = sample_layout()
            .add_block(BlockDraft::field("f-site", "Site"), "extras")
            .and_then(|m| {
                m.add_block(BlockDraft::related_list("rl-deals", "Deals", vec![]), "extras")
            })
            .and_then(|m| m.add_block(BlockDraft::field("f-fax", "Fax"), "extras"))
            .unwrap();

        let removed = model.remove_section("extras").unwrap();
        assert!(!removed.has_section("extras"));
        assert_eq!(removed.section_order(), ["details", "related_lists"]);

        let details: Vec<&str> = removed
            .blocks_in("details")
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(details, ["Name", "Email", "Site", "Fax"]);
        let deals = id_of(&removed, "rl-deals");
        assert_eq!(removed.block(&deals).unwrap().section, "related_lists");
        assert_eq!(removed.block(&deals).unwrap().order, 1);
        assert!(removed.check_invariants().is_empty());
    }

    #[test]
    fn reserved_sections_cannot_be_removed() {
        let model = sample_layout();
        for name in ["details", "related_lists", "header"] {
            assert_eq!(
                model.remove_section(name),
                Err(Rejection::ReservedSectionViolation(name.into()))
            );
        }
        assert_eq!(
            model.remove_section("ghost"),
            Err(Rejection::SectionNotFound("ghost".into()))
        );
    }

    #[test]
    fn reorder_swaps_custom_neighbours() {
        let model = custom(&LayoutModel::new(), &["a", "b", "c"]);
        let moved = model.reorder_section("c", Direction::Up).unwrap();
        assert_eq!(moved.section_order(), ["details", "related_lists", "a", "c", "b"]);
        let moved = moved.reorder_section("a", Direction::Down).unwrap();
        assert_eq!(moved.section_order(), ["details", "related_lists", "c", "a", "b"]);
    }

    #[test]
    fn reorder_is_noop_at_boundaries() {
        let model = custom(&LayoutModel::new(), &["a", "b"]);
        assert_eq!(model.reorder_section("a", Direction::Up), Ok(model.clone()));
        assert_eq!(model.reorder_section("b", Direction::Down), Ok(model.clone()));
    }

    #[test]
    fn reorder_skips_over_reserved_anchors() {
        let mut model = custom(&LayoutModel::new(), &["a", "b"]);
        model.section_order = vec![
            "a".into(),
            "details".into(),
            "b".into(),
            "related_lists".into(),
        ];
        let moved = model.reorder_section("b", Direction::Up).unwrap();
        assert_eq!(moved.section_order(), ["b", "details", "a", "related_lists"]);
        assert_eq!(
            model.reorder_section("details", Direction::Down),
            Err(Rejection::ReservedSectionViolation("details".into()))
        );
    }

    #[test]
    fn derived_type_falls_back_to_contents() {
        let mut model = sample_layout();
        model.registry.register("legacy", None);
        model.section_order.push("legacy".into());
        assert_eq!(model.derive_section_type("legacy"), SectionType::Field);

        let rl = id_of(&model, "rl-contacts");
        model.blocks.get_mut(&rl).unwrap().section = "legacy".into();
        assert_eq!(model.derive_section_type("legacy"), SectionType::RelatedList);
    }
}
