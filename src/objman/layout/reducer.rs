//! Command reducer: `(model, command) -> model'`.
//!
//! UI clients do not call the engine operations one by one; they send
//! [`LayoutCommand`]s. A drag-and-drop gesture, for instance, becomes a
//! `MoveBlock { source_block_id, target_section, target_index }` command. Commands
//! serialize as tagged JSON objects so an editing session can be recorded and
//! replayed:
//!
//! ```json
//! {"command": "move_block", "source_block_id": "…", "target_section": "extras", "target_index": 0}
//! ```

use super::sections::Direction;
use super::{LayoutModel, Outcome};
use crate::model::{BlockDraft, SectionType, Width};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LayoutCommand {
    AddBlock {
        draft: BlockDraft,
        section: String,
    },
    MoveBlock {
        source_block_id: Uuid,
        target_section: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_index: Option<usize>,
    },
    RemoveBlock {
        block_id: Uuid,
    },
    CreateSection {
        name: String,
        section_type: SectionType,
    },
    RenameSection {
        old_name: String,
        new_name: String,
    },
    RemoveSection {
        name: String,
    },
    ReorderSection {
        name: String,
        direction: Direction,
    },
    SetWidth {
        block_id: Uuid,
        width: Width,
    },
    SetVisibility {
        block_id: Uuid,
        visible: bool,
    },
    SetLabel {
        block_id: Uuid,
        label: String,
    },
    SetDisplayColumns {
        block_id: Uuid,
        columns: Vec<String>,
    },
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub model: LayoutModel,
    /// False when the command was a harmless no-op (e.g. removing an absent block).
    pub changed: bool,
    pub summary: String,
}

pub fn reduce(model: &LayoutModel, command: &LayoutCommand) -> Outcome<Transition> {
    let (next, summary) = match command {
        LayoutCommand::AddBlock { draft, section } => {
            let next = model.add_block(draft.clone(), section)?;
            (next, format!("Added {} '{}' to '{}'.", draft.kind(), draft.label, section))
        }
        LayoutCommand::MoveBlock {
            source_block_id,
            target_section,
            target_index,
        } => {
            let next = model.move_block(source_block_id, target_section, *target_index)?;
            let label = model
                .block(source_block_id)
                .map(|b| b.label.as_str())
                .unwrap_or_default();
            (next, format!("Moved '{}' to '{}'.", label, target_section))
        }
        LayoutCommand::RemoveBlock { block_id } => {
            let next = model.remove_block(block_id);
            let summary = match model.block(block_id) {
                Some(block) => format!("Removed '{}' from '{}'.", block.label, block.section),
                None => format!("Block {} is not in the layout; nothing removed.", block_id),
            };
            (next, summary)
        }
        LayoutCommand::CreateSection { name, section_type } => {
            let next = model.create_section(name, *section_type)?;
            let accepts = match section_type {
                SectionType::Field => "fields only",
                SectionType::RelatedList => "related lists only",
                SectionType::Mixed => "fields and related lists",
            };
            let created = next.section_order().last().cloned().unwrap_or_default();
            (next, format!("Created '{}' section for {}.", created, accepts))
        }
        LayoutCommand::RenameSection { old_name, new_name } => {
            let next = model.rename_section(old_name, new_name)?;
            (
                next,
                format!("Section renamed from '{}' to '{}'.", old_name, new_name),
            )
        }
        LayoutCommand::RemoveSection { name } => {
            let next = model.remove_section(name)?;
            (
                next,
                format!("Removed section '{}'; its blocks moved to the system sections.", name),
            )
        }
        LayoutCommand::ReorderSection { name, direction } => {
            let next = model.reorder_section(name, *direction)?;
            (next, format!("Moved '{}' section {:?}.", name, direction).to_lowercase())
        }
        LayoutCommand::SetWidth { block_id, width } => {
            let next = model.set_block_width(block_id, *width)?;
            (next, format!("Block {} width set to {:?}.", block_id, width).to_lowercase())
        }
        LayoutCommand::SetVisibility { block_id, visible } => {
            let next = model.set_block_visibility(block_id, *visible)?;
            let state = if *visible { "shown" } else { "hidden" };
            (next, format!("Block {} {}.", block_id, state))
        }
        LayoutCommand::SetLabel { block_id, label } => {
            let next = model.set_block_label(block_id, label)?;
            (next, format!("Block {} relabelled '{}'.", block_id, label))
        }
        LayoutCommand::SetDisplayColumns { block_id, columns } => {
            let next = model.set_display_columns(block_id, columns.clone())?;
            (
                next,
                format!("Related list {} shows {} column(s).", block_id, columns.len()),
            )
        }
    };

    let changed = next != *model;
    Ok(Transition {
        model: next,
        changed,
        summary,
    })
}
