use crate::commands::{load_layout, CmdMessage, CmdResult};
use crate::error::Result;
use crate::layout::{reduce, LayoutCommand};
use crate::model::{TenantId, Width};
use crate::store::MetadataStore;
use tracing::{debug, warn};

pub fn show<S: MetadataStore>(store: &S, tenant: &TenantId, object: &str) -> Result<CmdResult> {
    let (model, stored) = load_layout(store, tenant, object)?;
    let mut result = CmdResult::default();
    if !stored {
        result.add_message(CmdMessage::info(format!(
            "No layout stored for {}; showing an empty layout.",
            object
        )));
    }
    Ok(result.with_layout(model))
}

pub fn check<S: MetadataStore>(store: &S, tenant: &TenantId, object: &str) -> Result<CmdResult> {
    let (model, _) = load_layout(store, tenant, object)?;
    let problems = model.check_invariants();
    let mut result = CmdResult::default();
    if problems.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "Layout for {} is consistent ({} blocks in {} sections).",
            object,
            model.block_count(),
            model.section_order().len()
        )));
    }
    for problem in problems {
        result.add_message(CmdMessage::warning(problem));
    }
    Ok(result.with_layout(model))
}

/// Catalog entries of `object` that are not on its layout yet.
pub fn palette<S: MetadataStore>(store: &S, tenant: &TenantId, object: &str) -> Result<CmdResult> {
    let (model, _) = load_layout(store, tenant, object)?;
    let catalog = store.load_catalog(tenant, object)?;
    let palette: Vec<_> = model.unplaced(&catalog.items).into_iter().cloned().collect();

    let mut result = CmdResult::default();
    if palette.is_empty() {
        result.add_message(CmdMessage::info("Every catalog item is already placed."));
    }
    Ok(result.with_palette(palette))
}

/// Applies a batch of commands and stores the result.
///
/// The batch is all-or-nothing: the first rejected command aborts it and nothing
/// is saved. Drafts without a width get `default_width`.
pub fn apply<S: MetadataStore>(
    store: &mut S,
    tenant: &TenantId,
    object: &str,
    commands: &[LayoutCommand],
    default_width: Width,
) -> Result<CmdResult> {
    let (mut model, _) = load_layout(store, tenant, object)?;
    let mut result = CmdResult::default();
    let mut changed = false;

    for (index, command) in commands.iter().enumerate() {
        let command = with_default_width(command, default_width);
        let transition = reduce(&model, &command).map_err(|rejection| {
            warn!(index, %rejection, "layout command rejected");
            rejection
        })?;
        let message = if transition.changed {
            CmdMessage::success(transition.summary)
        } else {
            CmdMessage::info(transition.summary)
        };
        result.add_message(message);
        changed |= transition.changed;
        model = transition.model;
    }

    if changed {
        store.save_layout(tenant, object, &model.to_snapshot())?;
        debug!(%tenant, object, commands = commands.len(), "layout saved");
    } else {
        result.add_message(CmdMessage::info("Layout unchanged; nothing saved."));
    }
    Ok(result.with_layout(model))
}

fn with_default_width(command: &LayoutCommand, default_width: Width) -> LayoutCommand {
    match command {
        LayoutCommand::AddBlock { draft, section } if draft.width.is_none() => {
            LayoutCommand::AddBlock {
                draft: draft.clone().with_width(default_width),
                section: section.clone(),
            }
        }
        other => other.clone(),
    }
}
