//! Block placement: add, move, remove, and per-block edits.
//!
//! Moving a block is one algorithm for both reordering inside a section and
//! dragging it across sections: take the block out, close the gap it leaves,
//! insert it at the requested position in the target section, renumber.

use super::{LayoutModel, Outcome, Rejection};
use crate::model::{normalize_section_name, BlockContent, BlockDraft, LayoutBlock, Width};
use tracing::{debug, info};
use uuid::Uuid;

impl LayoutModel {
    /// Places a draft at the end of `target_section`.
    pub fn add_block(&self, draft: BlockDraft, target_section: &str) -> Outcome<LayoutModel> {
        self.place_block(draft, target_section).map(|(model, _)| model)
    }

    /// Like [`add_block`](Self::add_block), also returning the id assigned to the new block.
    pub fn place_block(
        &self,
        draft: BlockDraft,
        target_section: &str,
    ) -> Outcome<(LayoutModel, Uuid)> {
        let section = normalize_section_name(target_section);
        self.ensure_accepts(&section, draft.kind())?;

        let order = self.blocks.values().filter(|b| b.section == section).count();
        let block = LayoutBlock {
            id: Uuid::new_v4(),
            content: draft.content,
            label: draft.label,
            section,
            order,
            width: draft.width.unwrap_or_default(),
            visible: draft.visible,
        };
        let id = block.id;
        debug!(block = %id, kind = %block.kind(), section = %block.section, order, "block added");

        let mut next = self.clone();
        next.blocks.insert(id, block);
        Ok((next, id))
    }

    /// Moves a block to `target_index` of `target_section` (end of section when the
    /// index is absent or past the end). Moving an unknown block is a no-op.
    pub fn move_block(
        &self,
        block_id: &Uuid,
        target_section: &str,
        target_index: Option<usize>,
    ) -> Outcome<LayoutModel> {
        let Some(block) = self.blocks.get(block_id) else {
            info!(block = %block_id, "move ignored: block not in layout");
            return Ok(self.clone());
        };

        let target = normalize_section_name(target_section);
        self.ensure_accepts(&target, block.kind())?;
        let source = block.section.clone();

        let mut next = self.clone();
        if let Some(moving) = next.blocks.get_mut(block_id) {
            moving.section = target.clone();
        }
        if source != target {
            next.densify(&source);
        }

        let mut ordered: Vec<Uuid> = next
            .blocks_in(&target)
            .iter()
            .map(|b| b.id)
            .filter(|id| id != block_id)
            .collect();
        let position = target_index.unwrap_or(ordered.len()).min(ordered.len());
        ordered.insert(position, *block_id);
        next.renumber(&ordered);

        debug!(block = %block_id, from = %source, to = %target, position, "block moved");
        Ok(next)
    }

    /// Removes a block and closes the gap in its section. Removing an unknown
    /// block returns the model unchanged.
    pub fn remove_block(&self, block_id: &Uuid) -> LayoutModel {
        let mut next = self.clone();
        match next.blocks.remove(block_id) {
            Some(removed) => {
                next.densify(&removed.section);
                debug!(block = %block_id, section = %removed.section, "block removed");
            }
            None => info!(block = %block_id, "remove ignored: block not in layout"),
        }
        next
    }

    pub fn set_block_width(&self, block_id: &Uuid, width: Width) -> Outcome<LayoutModel> {
        self.edit_block(block_id, |block| {
            block.width = width;
            Ok(())
        })
    }

    pub fn set_block_visibility(&self, block_id: &Uuid, visible: bool) -> Outcome<LayoutModel> {
        self.edit_block(block_id, |block| {
            block.visible = visible;
            Ok(())
        })
    }

    pub fn set_block_label(&self, block_id: &Uuid, label: &str) -> Outcome<LayoutModel> {
        self.edit_block(block_id, |block| {
            block.label = label.to_string();
            Ok(())
        })
    }

    /// Replaces the columns shown by a related-list block.
    pub fn set_display_columns(
        &self,
        block_id: &Uuid,
        columns: Vec<String>,
    ) -> Outcome<LayoutModel> {
        self.edit_block(block_id, |block| match &mut block.content {
            BlockContent::RelatedList {
                display_columns, ..
            } => {
                *display_columns = columns;
                Ok(())
            }
            other => Err(Rejection::IncompatibleSectionType {
                kind: other.kind(),
                section: block.section.clone(),
            }),
        })
    }

    fn edit_block<F>(&self, block_id: &Uuid, edit: F) -> Outcome<LayoutModel>
    where
        F: FnOnce(&mut LayoutBlock) -> Outcome<()>,
    {
        let mut next = self.clone();
        let block = next
            .blocks
            .get_mut(block_id)
            .ok_or(Rejection::BlockNotFound(*block_id))?;
        edit(block)?;
        Ok(next)
    }
}
