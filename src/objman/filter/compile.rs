//! Translates a filter expression into a parameterized SQL predicate.
//!
//! ```text
//! [{logic: OR, [name starts_with "Acme", amount > 10]}, {logic: AND, [is_active == true]}]
//!   => (name LIKE $1 OR amount > $2) AND (is_active = $3)      ["Acme%", 10, true]
//! ```
//!
//! Values never appear in the predicate text; they are handed back as an ordered
//! parameter list for the query layer to bind.

use super::{validate, FilterExpression, FilterFieldCatalog, FilterValue};
use crate::error::{ObjmanError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `$1, $2, ...`
    #[default]
    Dollar,
    /// `?` for every parameter
    Question,
}

impl PlaceholderStyle {
    fn placeholder(self, position: usize) -> String {
        match self {
            PlaceholderStyle::Dollar => format!("${}", position),
            PlaceholderStyle::Question => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub table_alias: Option<String>,
    pub placeholder: PlaceholderStyle,
    pub case_insensitive_like: bool,
}

impl CompileOptions {
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    fn column(&self, field_name: &str) -> String {
        match self.table_alias.as_deref().filter(|a| !a.is_empty()) {
            Some(alias) => format!("{}.{}", alias, field_name),
            None => field_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CompiledPredicate {
    pub predicate: String,
    pub parameters: Vec<FilterValue>,
}

impl CompiledPredicate {
    /// An empty predicate matches every record.
    pub fn is_empty(&self) -> bool {
        self.predicate.is_empty()
    }
}

/// Compiles with default options and an optional table alias.
pub fn compile(expr: &FilterExpression, table_alias: Option<&str>) -> CompiledPredicate {
    let options = CompileOptions {
        table_alias: table_alias.map(str::to_string),
        ..CompileOptions::default()
    };
    compile_with(expr, &options)
}

/// Groups and conditions are emitted in their stored order (`group_order`,
/// `condition_order`). Incomplete conditions, conditions with an unrecognised
/// operator and groups left empty are skipped.
pub fn compile_with(expr: &FilterExpression, options: &CompileOptions) -> CompiledPredicate {
    let mut parameters = Vec::new();
    let mut clauses = Vec::new();

    for group in expr.ordered_groups() {
        let mut fragments = Vec::new();
        for condition in group.ordered_conditions() {
            let Some(value) = condition.value.as_ref().filter(|_| condition.is_complete()) else {
                continue;
            };
            let Some(operator) = condition.operator.known() else {
                warn!(operator = %condition.operator, "unrecognised operator left out of predicate");
                continue;
            };
            let wildcard = operator.wildcard();
            let parameter = if operator.is_pattern() {
                FilterValue::Text(wildcard.apply(&value.to_string()))
            } else {
                value.clone()
            };
            parameters.push(parameter);
            fragments.push(format!(
                "{} {} {}",
                options.column(&condition.field_name),
                operator.sql_comparator(options.case_insensitive_like),
                options.placeholder.placeholder(parameters.len())
            ));
        }
        if !fragments.is_empty() {
            let joiner = format!(" {} ", group.logic.keyword());
            clauses.push(format!("({})", fragments.join(&joiner)));
        }
    }

    let compiled = CompiledPredicate {
        predicate: clauses.join(" AND "),
        parameters,
    };
    debug!(
        groups = clauses.len(),
        parameters = compiled.parameters.len(),
        "filter compiled"
    );
    compiled
}

/// Validates against `catalog`, rewrites field names to their catalog spelling,
/// then compiles. Only catalog columns can reach the predicate text this way.
pub fn compile_checked(
    expr: &FilterExpression,
    catalog: &FilterFieldCatalog,
    options: &CompileOptions,
) -> Result<CompiledPredicate> {
    let result = validate(expr, catalog);
    if !result.is_valid {
        return Err(ObjmanError::InvalidFilter(result.errors));
    }

    let mut resolved = expr.clone();
    for condition in resolved.groups.iter_mut().flat_map(|g| g.conditions.iter_mut()) {
        if let Some(field) = catalog.get(&condition.field_name) {
            condition.field_name = field.field_name.clone();
        }
    }
    Ok(compile_with(&resolved, options))
}
