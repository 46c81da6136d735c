//! Wire format for persisted layouts.
//!
//! The persistence layer stores a flat list of block records:
//!
//! ```json
//! [{"block_type": "field", "field_id": "…", "related_list_id": null, "button_id": null,
//!   "label": "Name", "section": "details", "display_order": 0, "width": "half",
//!   "is_visible": true}]
//! ```
//!
//! Section order and declared section types are not part of that list, so a
//! [`LayoutSnapshot`] may carry an optional `sections` manifest next to the blocks.
//! A bare block list still hydrates: reserved sections come first, custom sections
//! follow in order of first appearance, and their types are inferred from content.

use super::LayoutModel;
use crate::error::{ObjmanError, Result};
use crate::model::{
    is_reserved_section, normalize_section_name, BlockContent, BlockKind, LayoutBlock,
    SectionType, Width, HEADER_SECTION, RESERVED_SECTIONS,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub block_type: BlockKind,
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(default)]
    pub related_list_id: Option<String>,
    #[serde(default)]
    pub button_id: Option<String>,
    pub label: String,
    pub section: String,
    pub display_order: usize,
    #[serde(default)]
    pub width: Option<Width>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_columns: Option<Vec<String>>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_type: Option<SectionType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
    pub blocks: Vec<BlockRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotWire {
    Full(LayoutSnapshot),
    Blocks(Vec<BlockRecord>),
}

impl LayoutSnapshot {
    pub fn from_blocks(blocks: Vec<BlockRecord>) -> Self {
        Self {
            sections: Vec::new(),
            blocks,
        }
    }

    /// Accepts either a full snapshot object or a bare array of block records.
    pub fn parse(json: &str) -> Result<Self> {
        let wire: SnapshotWire = serde_json::from_str(json)?;
        Ok(match wire {
            SnapshotWire::Full(snapshot) => snapshot,
            SnapshotWire::Blocks(blocks) => Self::from_blocks(blocks),
        })
    }
}

impl BlockRecord {
    fn content(&self) -> Result<BlockContent> {
        let missing = |column: &str| {
            ObjmanError::InvalidSnapshot(format!(
                "{} block {:?} has no {}",
                self.block_type, self.label, column
            ))
        };
        Ok(match self.block_type {
            BlockKind::Field => BlockContent::Field {
                field_id: self.field_id.clone().ok_or_else(|| missing("field_id"))?,
            },
            BlockKind::RelatedList => BlockContent::RelatedList {
                related_list_id: self
                    .related_list_id
                    .clone()
                    .ok_or_else(|| missing("related_list_id"))?,
                display_columns: self.display_columns.clone().unwrap_or_default(),
            },
            BlockKind::Button => BlockContent::Button {
                button_id: self.button_id.clone().ok_or_else(|| missing("button_id"))?,
            },
        })
    }

    fn from_block(block: &LayoutBlock) -> Self {
        let mut record = Self {
            id: Some(block.id),
            block_type: block.kind(),
            field_id: None,
            related_list_id: None,
            button_id: None,
            label: block.label.clone(),
            section: block.section.clone(),
            display_order: block.order,
            width: Some(block.width),
            is_visible: block.visible,
            display_columns: None,
        };
        match &block.content {
            BlockContent::Field { field_id } => record.field_id = Some(field_id.clone()),
            BlockContent::RelatedList {
                related_list_id,
                display_columns,
            } => {
                record.related_list_id = Some(related_list_id.clone());
                record.display_columns = Some(display_columns.clone());
            }
            BlockContent::Button { button_id } => record.button_id = Some(button_id.clone()),
        }
        record
    }
}

impl LayoutModel {
    /// Builds a model from a persisted snapshot.
    ///
    /// Orders are re-densified per section. Placements that break the section type
    /// rules are kept (the data is what it is) but logged.
    pub fn hydrate(snapshot: &LayoutSnapshot) -> Result<LayoutModel> {
        let mut model = LayoutModel::new();

        if !snapshot.sections.is_empty() {
            let mut order = Vec::new();
            for record in &snapshot.sections {
                let name = normalize_section_name(&record.name);
                if name.is_empty() || name == HEADER_SECTION || order.contains(&name) {
                    continue;
                }
                if !is_reserved_section(&name) {
                    model.registry.register(name.clone(), record.section_type);
                }
                order.push(name);
            }
            for (position, reserved) in RESERVED_SECTIONS.iter().enumerate() {
                if !order.iter().any(|s| s == reserved) {
                    order.insert(position.min(order.len()), reserved.to_string());
                }
            }
            model.section_order = order;
        }

        let mut seen = HashSet::new();
        let mut positions: BTreeMap<Uuid, (usize, usize)> = BTreeMap::new();
        for (index, record) in snapshot.blocks.iter().enumerate() {
            let section = normalize_section_name(&record.section);
            if section.is_empty() {
                return Err(ObjmanError::InvalidSnapshot(format!(
                    "block {:?} has no section",
                    record.label
                )));
            }
            if section != HEADER_SECTION && !model.registry.contains(&section) {
                model.registry.register(section.clone(), None);
                model.section_order.push(section.clone());
            }

            let id = record.id.unwrap_or_else(Uuid::new_v4);
            if !seen.insert(id) {
                return Err(ObjmanError::InvalidSnapshot(format!(
                    "duplicate block id {}",
                    id
                )));
            }
            positions.insert(id, (record.display_order, index));
            model.blocks.insert(
                id,
                LayoutBlock {
                    id,
                    content: record.content()?,
                    label: record.label.clone(),
                    section,
                    order: record.display_order,
                    width: record.width.unwrap_or_default(),
                    visible: record.is_visible,
                },
            );
        }

        let sections: HashSet<String> = model.blocks.values().map(|b| b.section.clone()).collect();
        for section in sections {
            let mut ids: Vec<Uuid> = model
                .blocks
                .values()
                .filter(|b| b.section == section)
                .map(|b| b.id)
                .collect();
            ids.sort_by_key(|id| positions.get(id).copied().unwrap_or_default());
            model.renumber(&ids);
        }

        for problem in model.check_invariants() {
            warn!("hydrated layout: {}", problem);
        }
        Ok(model)
    }

    /// Serializes the model back into the persisted shape: sections in display
    /// order, then blocks section by section (buttons last).
    pub fn to_snapshot(&self) -> LayoutSnapshot {
        let sections = self
            .section_order
            .iter()
            .map(|name| SectionRecord {
                name: name.clone(),
                section_type: self.registry.declared(name),
            })
            .collect();

        let blocks = self
            .section_order
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(HEADER_SECTION))
            .flat_map(|section| self.blocks_in(section))
            .map(BlockRecord::from_block)
            .collect();

        LayoutSnapshot { sections, blocks }
    }
}
