use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::{self, CompileOptions, FilterEdit, FilterFieldCatalog};
use crate::model::TenantId;
use crate::store::{MetadataStore, RecordList};
use tracing::debug;

fn load<S: MetadataStore>(
    store: &S,
    tenant: &TenantId,
    list: &str,
) -> Result<(RecordList, FilterFieldCatalog)> {
    let record_list = store.load_record_list(tenant, list)?;
    let catalog = store.load_catalog(tenant, &record_list.object_id)?;
    Ok((record_list, catalog.filter_catalog()))
}

pub fn validate<S: MetadataStore>(store: &S, tenant: &TenantId, list: &str) -> Result<CmdResult> {
    let (record_list, catalog) = load(store, tenant, list)?;
    let validation = filter::validate(&record_list.filter_criteria, &catalog);

    let mut result = CmdResult::default();
    if validation.is_valid {
        result.add_message(CmdMessage::success(format!(
            "Filters of '{}' are valid.",
            record_list.name
        )));
    }
    for error in &validation.errors {
        result.add_message(CmdMessage::error(error.clone()));
    }
    Ok(result
        .with_filters(record_list.filter_criteria)
        .with_validation(validation))
}

/// Validates and compiles the list's filters. Invalid filters are an error.
pub fn compile<S: MetadataStore>(
    store: &S,
    tenant: &TenantId,
    list: &str,
    options: &CompileOptions,
) -> Result<CmdResult> {
    let (record_list, catalog) = load(store, tenant, list)?;
    let compiled = filter::compile_checked(&record_list.filter_criteria, &catalog, options)?;

    let mut result = CmdResult::default();
    if compiled.is_empty() {
        result.add_message(CmdMessage::info("No filters applied; every record matches."));
    }
    Ok(result.with_compiled(compiled))
}

pub fn describe<S: MetadataStore>(store: &S, tenant: &TenantId, list: &str) -> Result<CmdResult> {
    let (record_list, catalog) = load(store, tenant, list)?;
    let description = filter::describe(&record_list.filter_criteria, &catalog);
    Ok(CmdResult::default().with_description(description))
}

/// Applies builder edits to the list's filters and saves them.
///
/// Stored criteria are normalized first so conditions saved without ids can be
/// addressed. Edits are all-or-nothing like layout batches.
pub fn edit<S: MetadataStore>(
    store: &mut S,
    tenant: &TenantId,
    list: &str,
    edits: &[FilterEdit],
) -> Result<CmdResult> {
    let mut record_list = store.load_record_list(tenant, list)?;
    let mut expr = record_list.filter_criteria.normalized();
    for edit in edits {
        expr = expr.apply(edit)?;
    }
    let expr = expr.normalized();

    record_list.filter_criteria = expr.clone();
    store.save_record_list(tenant, list, &record_list)?;
    debug!(%tenant, list, edits = edits.len(), "filters saved");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Applied {} edit(s) to '{}'.",
        edits.len(),
        record_list.name
    )));
    Ok(result.with_filters(expr))
}
