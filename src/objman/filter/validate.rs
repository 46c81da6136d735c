//! Checks a filter expression against the field catalog before it is compiled.
//!
//! Errors are positional (`Group 1, Condition 2: ...`, counting from one in the
//! order the groups are stored) so the builder can show them next to the offending
//! row. Each condition reports at most one problem: the first check that fails.

use super::{FieldType, FilterCondition, FilterExpression, FilterFieldCatalog, FilterValue, Operator};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn validate(expr: &FilterExpression, catalog: &FilterFieldCatalog) -> ValidationResult {
    let mut errors = Vec::new();
    for (g, group) in expr.groups.iter().enumerate() {
        if group.conditions.is_empty() {
            errors.push(format!("Group {}: Must have at least one condition", g + 1));
            continue;
        }
        for (c, condition) in group.conditions.iter().enumerate() {
            if let Err(problem) = check_condition(condition, catalog) {
                errors.push(format!("Group {}, Condition {}: {}", g + 1, c + 1, problem));
            }
        }
    }
    ValidationResult::from_errors(errors)
}

fn check_condition(condition: &FilterCondition, catalog: &FilterFieldCatalog) -> Result<(), String> {
    if condition.field_name.trim().is_empty() {
        return Err("Field is required".to_string());
    }
    let field = catalog
        .get(&condition.field_name)
        .ok_or_else(|| format!("Field \"{}\" not found", condition.field_name))?;
    if !field.is_filterable {
        return Err(format!("Field \"{}\" is not filterable", condition.field_name));
    }

    let allowed = Operator::valid_for_spelling(&field.field_type);
    let operator_ok = condition
        .operator
        .known()
        .is_some_and(|operator| allowed.contains(&operator));
    if !operator_ok {
        return Err(format!(
            "Operator \"{}\" is not valid for field type \"{}\"",
            condition.operator, field.field_type
        ));
    }

    let value = match &condition.value {
        Some(value) if !value.is_blank() => value,
        _ => return Err("Value is required".to_string()),
    };
    let Some(field_type) = field.field_type.known() else {
        return Ok(());
    };
    let type_ok = match field_type {
        FieldType::Text => true,
        FieldType::Number => matches!(value, FilterValue::Number(_)),
        FieldType::Boolean => matches!(value, FilterValue::Bool(_)),
        FieldType::Date => value.is_date(),
    };
    if !type_ok {
        let expected = match field_type {
            FieldType::Date => "a valid date",
            FieldType::Boolean => "a boolean",
            _ => "a number",
        };
        return Err(format!(
            "Value must be {} for field type \"{}\"",
            expected, field_type
        ));
    }
    Ok(())
}
