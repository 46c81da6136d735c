//! Human-readable rendering of a filter expression, e.g.
//! `Account Name starts with Acme OR Amount greater than 10 AND Active equals Yes`.

use super::{FieldType, FilterCondition, FilterExpression, FilterFieldCatalog};

pub const NO_FILTERS: &str = "No filters applied";

pub fn describe(expr: &FilterExpression, catalog: &FilterFieldCatalog) -> String {
    let groups: Vec<String> = expr
        .ordered_groups()
        .into_iter()
        .map(|group| {
            let conditions: Vec<String> = group
                .ordered_conditions()
                .into_iter()
                .filter(|c| c.is_complete())
                .map(|c| describe_condition(c, catalog))
                .collect();
            conditions.join(&format!(" {} ", group.logic.keyword()))
        })
        .filter(|text| !text.is_empty())
        .collect();

    if groups.is_empty() {
        NO_FILTERS.to_string()
    } else {
        groups.join(" AND ")
    }
}

fn describe_condition(condition: &FilterCondition, catalog: &FilterFieldCatalog) -> String {
    let field = catalog
        .get(&condition.field_name)
        .map(|f| f.label())
        .unwrap_or(&condition.field_name);
    let value = match (&condition.value, condition.field_type.known()) {
        (Some(value), Some(FieldType::Boolean)) => {
            let answer = if value.is_truthy() { "Yes" } else { "No" };
            answer.to_string()
        }
        (Some(value), _) => value.to_string(),
        (None, _) => String::new(),
    };
    let operator = match condition.operator.known() {
        Some(operator) => operator.display_name().to_string(),
        None => condition.operator.to_string(),
    };
    format!("{} {} {}", field, operator, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterField, FilterGroup, FilterValue, Logic, Operator};

    fn catalog() -> FilterFieldCatalog {
        FilterFieldCatalog::new(vec![
            FilterField::new("name", FieldType::Text, "Account Name"),
            FilterField::new("is_active", FieldType::Boolean, "Active"),
        ])
    }

    #[test]
    fn empty_expression() {
        assert_eq!(describe(&FilterExpression::default(), &catalog()), NO_FILTERS);
        let only_blank = FilterExpression::new(vec![FilterGroup::new(
            "g",
            Logic::And,
            vec![FilterCondition::blank("c", 0)],
        )]);
        assert_eq!(describe(&only_blank, &catalog()), NO_FILTERS);
    }

    #[test]
    fn sentence_uses_display_names_and_logic() {
        let expr = FilterExpression::new(vec![
            FilterGroup::new(
                "g1",
                Logic::Or,
                vec![
                    FilterCondition::new("name", FieldType::Text, Operator::Like, FilterValue::text("Acme")),
                    FilterCondition::new("region", FieldType::Text, Operator::Eq, FilterValue::text("EU")),
                ],
            ),
            FilterGroup::new(
                "g2",
                Logic::And,
                vec![FilterCondition::new(
                    "isActive",
                    FieldType::Boolean,
                    Operator::Eq,
                    FilterValue::Bool(false),
                )],
            ),
        ]);
        assert_eq!(
            describe(&expr, &catalog()),
            "Account Name contains Acme OR region equals EU AND Active equals No"
        );
    }
}
