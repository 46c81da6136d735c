//! Editing a filter expression.
//!
//! Every edit returns a new [`FilterExpression`]; the original is never touched.
//! Edits address groups and conditions by id, so conditions that arrive without an
//! id should be passed through [`FilterExpression::normalized`] first.

use super::{
    FieldType, FilterCondition, FilterEditError, FilterGroup, FilterValue, Logic, Operator, Spelling,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpression {
    pub groups: Vec<FilterGroup>,
}

/// Partial update of a condition; `None` leaves the attribute as is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

/// One builder gesture, as sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum FilterEdit {
    AddGroup,
    RemoveGroup {
        group_id: String,
    },
    AddCondition {
        group_id: String,
    },
    RemoveCondition {
        group_id: String,
        condition_id: String,
    },
    UpdateCondition {
        group_id: String,
        condition_id: String,
        patch: ConditionPatch,
    },
    SetLogic {
        group_id: String,
        logic: Logic,
    },
    Clear,
}

fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

impl FilterExpression {
    pub fn new(groups: Vec<FilterGroup>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, group_id: &str) -> Option<&FilterGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Groups sorted by `group_order` (stable for ties).
    pub fn ordered_groups(&self) -> Vec<&FilterGroup> {
        let mut groups: Vec<&FilterGroup> = self.groups.iter().collect();
        groups.sort_by_key(|g| g.group_order);
        groups
    }

    /// Sorts groups and conditions, renumbers their orders from zero and gives
    /// every condition an id.
    pub fn normalized(&self) -> FilterExpression {
        let groups = self
            .ordered_groups()
            .into_iter()
            .enumerate()
            .map(|(group_order, group)| {
                let conditions = group
                    .ordered_conditions()
                    .into_iter()
                    .enumerate()
                    .map(|(condition_order, condition)| FilterCondition {
                        id: Some(condition.id.clone().unwrap_or_else(|| new_id("condition"))),
                        condition_order: condition_order as i64,
                        ..condition.clone()
                    })
                    .collect();
                FilterGroup {
                    id: group.id.clone(),
                    conditions,
                    logic: group.logic,
                    group_order: group_order as i64,
                }
            })
            .collect();
        FilterExpression { groups }
    }

    /// Appends an `AND` group seeded with one blank condition.
    pub fn add_group(&self) -> (FilterExpression, String) {
        let id = new_id("group");
        let mut next = self.clone();
        next.groups.push(FilterGroup {
            id: id.clone(),
            conditions: vec![FilterCondition::blank(new_id("condition"), 0)],
            logic: Logic::And,
            group_order: self.groups.len() as i64,
        });
        debug!(group = %id, "filter group added");
        (next, id)
    }

    /// Removes a group. The last remaining group cannot be removed; use
    /// [`FilterExpression::clear`] to drop all filtering.
    pub fn remove_group(&self, group_id: &str) -> Result<FilterExpression, FilterEditError> {
        self.position(group_id)?;
        if self.groups.len() <= 1 {
            return Err(FilterEditError::LastGroup);
        }
        let mut next = self.clone();
        next.groups.retain(|g| g.id != group_id);
        Ok(next)
    }

    pub fn add_condition(&self, group_id: &str) -> Result<(FilterExpression, String), FilterEditError> {
        let position = self.position(group_id)?;
        let id = new_id("condition");
        let mut next = self.clone();
        let group = &mut next.groups[position];
        let order = group.conditions.len() as i64;
        group.conditions.push(FilterCondition::blank(id.clone(), order));
        Ok((next, id))
    }

    pub fn remove_condition(
        &self,
        group_id: &str,
        condition_id: &str,
    ) -> Result<FilterExpression, FilterEditError> {
        let (g, c) = self.condition_position(group_id, condition_id)?;
        let mut next = self.clone();
        next.groups[g].conditions.remove(c);
        Ok(next)
    }

    /// Applies `patch` to one condition. Switching to a field type that does not
    /// support the current operator, or an unrecognised operator, resets it to `==`.
    pub fn update_condition(
        &self,
        group_id: &str,
        condition_id: &str,
        patch: &ConditionPatch,
    ) -> Result<FilterExpression, FilterEditError> {
        let (g, c) = self.condition_position(group_id, condition_id)?;
        let mut next = self.clone();
        let condition = &mut next.groups[g].conditions[c];
        if let Some(field_name) = &patch.field_name {
            condition.field_name = field_name.clone();
        }
        if let Some(field_type) = patch.field_type {
            condition.field_type = Spelling::Known(field_type);
        }
        if let Some(operator) = patch.operator {
            condition.operator = Spelling::Known(operator);
        }
        let allowed = Operator::valid_for_spelling(&condition.field_type);
        if !condition.operator.known().is_some_and(|op| allowed.contains(&op)) {
            condition.operator = Spelling::Known(Operator::Eq);
        }
        if let Some(value) = &patch.value {
            condition.value = Some(value.clone());
        }
        Ok(next)
    }

    pub fn set_logic(&self, group_id: &str, logic: Logic) -> Result<FilterExpression, FilterEditError> {
        let position = self.position(group_id)?;
        let mut next = self.clone();
        next.groups[position].logic = logic;
        Ok(next)
    }

    pub fn clear(&self) -> FilterExpression {
        FilterExpression::default()
    }

    pub fn apply(&self, edit: &FilterEdit) -> Result<FilterExpression, FilterEditError> {
        match edit {
            FilterEdit::AddGroup => Ok(self.add_group().0),
            FilterEdit::RemoveGroup { group_id } => self.remove_group(group_id),
            FilterEdit::AddCondition { group_id } => Ok(self.add_condition(group_id)?.0),
            FilterEdit::RemoveCondition {
                group_id,
                condition_id,
            } => self.remove_condition(group_id, condition_id),
            FilterEdit::UpdateCondition {
                group_id,
                condition_id,
                patch,
            } => self.update_condition(group_id, condition_id, patch),
            FilterEdit::SetLogic { group_id, logic } => self.set_logic(group_id, *logic),
            FilterEdit::Clear => Ok(self.clear()),
        }
    }

    fn position(&self, group_id: &str) -> Result<usize, FilterEditError> {
        self.groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| FilterEditError::GroupNotFound(group_id.to_string()))
    }

    fn condition_position(
        &self,
        group_id: &str,
        condition_id: &str,
    ) -> Result<(usize, usize), FilterEditError> {
        let g = self.position(group_id)?;
        let c = self.groups[g]
            .conditions
            .iter()
            .position(|c| c.id.as_deref() == Some(condition_id))
            .ok_or_else(|| FilterEditError::ConditionNotFound {
                group: group_id.to_string(),
                condition: condition_id.to_string(),
            })?;
        Ok((g, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_group() -> FilterExpression {
        FilterExpression::new(vec![FilterGroup::new(
            "g1",
            Logic::And,
            vec![FilterCondition {
                id: Some("c1".into()),
                ..FilterCondition::new("name", FieldType::Text, Operator::Contains, FilterValue::text("acme"))
            }],
        )])
    }

    #[test]
    fn add_group_seeds_blank_condition() {
        let (expr, id) = single_group().add_group();
        assert_eq!(expr.groups.len(), 2);
        let group = expr.group(&id).unwrap();
        assert_eq!(group.group_order, 1);
        assert_eq!(group.logic, Logic::And);
        assert_eq!(group.conditions.len(), 1);
        assert!(!group.conditions[0].is_complete());
    }

    #[test]
    fn last_group_cannot_be_removed() {
        let expr = single_group();
        assert_eq!(expr.remove_group("g1"), Err(FilterEditError::LastGroup));
        assert_eq!(
            expr.remove_group("nope"),
            Err(FilterEditError::GroupNotFound("nope".into()))
        );

        let (two, id) = expr.add_group();
        let one = two.remove_group("g1").unwrap();
        assert_eq!(one.groups.len(), 1);
        assert_eq!(one.groups[0].id, id);
    }

    #[test]
    fn condition_lifecycle() {
        let (expr, id) = single_group().add_condition("g1").unwrap();
        assert_eq!(expr.groups[0].conditions.len(), 2);
        assert_eq!(expr.groups[0].conditions[1].condition_order, 1);

        let patch = ConditionPatch {
            field_name: Some("amount".into()),
            field_type: Some(FieldType::Number),
            operator: Some(Operator::Gte),
            value: Some(FilterValue::number(100)),
        };
        let expr = expr.update_condition("g1", &id, &patch).unwrap();
        let updated = &expr.groups[0].conditions[1];
        assert_eq!(updated.operator, Spelling::Known(Operator::Gte));
        assert!(updated.is_complete());

        let expr = expr.remove_condition("g1", &id).unwrap();
        assert_eq!(expr.groups[0].conditions.len(), 1);
        assert!(matches!(
            expr.remove_condition("g1", &id),
            Err(FilterEditError::ConditionNotFound { .. })
        ));
    }

    #[test]
    fn type_change_resets_incompatible_operator() {
        let patch = ConditionPatch {
            field_type: Some(FieldType::Boolean),
            ..ConditionPatch::default()
        };
        let expr = single_group().update_condition("g1", "c1", &patch).unwrap();
        assert_eq!(expr.groups[0].conditions[0].operator.known(), Some(Operator::Eq));
    }

    #[test]
    fn set_logic_and_clear() {
        let expr = single_group().set_logic("g1", Logic::Or).unwrap();
        assert_eq!(expr.groups[0].logic, Logic::Or);
        assert!(expr.clear().is_empty());
    }

    #[test]
    fn normalized_sorts_renumbers_and_assigns_ids() {
        let expr: FilterExpression = serde_json::from_str(
            r#"[
                {"id": "late", "group_order": 7, "conditions": []},
                {"id": "early", "group_order": 2, "conditions": [
                    {"field_name": "b", "field_type": "text", "operator": "==", "value": "2", "condition_order": 9},
                    {"field_name": "a", "field_type": "text", "operator": "==", "value": "1", "condition_order": 3}
                ]}
            ]"#,
        )
        .unwrap();

        let normalized = expr.normalized();
        assert_eq!(normalized.groups[0].id, "early");
        assert_eq!(normalized.groups[1].group_order, 1);
        let conditions = &normalized.groups[0].conditions;
        assert_eq!(conditions[0].field_name, "a");
        assert_eq!(conditions[1].condition_order, 1);
        assert!(conditions.iter().all(|c| c.id.is_some()));
    }

    #[test]
    fn edits_from_json() {
        let edit: FilterEdit = serde_json::from_str(
            r#"{"edit": "set_logic", "group_id": "g1", "logic": "OR"}"#,
        )
        .unwrap();
        let expr = single_group().apply(&edit).unwrap();
        assert_eq!(expr.groups[0].logic, Logic::Or);
    }
}
