//! # Filter Expression Compiler
//!
//! Record lists are filtered by a list of [`FilterGroup`]s. Conditions inside a
//! group are combined with the group's own [`Logic`]; groups are always combined
//! with `AND`. The same JSON shape is exchanged with the filter builder UI and the
//! persistence layer:
//!
//! ```json
//! [{"id": "g1", "logic": "OR", "group_order": 0, "conditions": [
//!     {"id": "c1", "field_name": "name", "field_type": "text",
//!      "operator": "starts_with", "value": "Acme", "condition_order": 0}]}]
//! ```
//!
//! The pipeline is: edit ([`expression`]) → check against the field catalog
//! ([`validate`]) → translate into a parameterized predicate ([`compile`]) and a
//! sentence for humans ([`describe`]). Validation is the caller's job:
//! [`compile::compile`] trusts its input, [`compile::compile_checked`] does both.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod catalog;
pub mod compile;
pub mod describe;
pub mod expression;
pub mod operator;
pub mod validate;

pub use catalog::{FilterField, FilterFieldCatalog};
pub use compile::{compile, compile_checked, compile_with, CompileOptions, CompiledPredicate, PlaceholderStyle};
pub use describe::describe;
pub use expression::{ConditionPatch, FilterEdit, FilterExpression};
pub use operator::Operator;
pub use validate::{validate, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
}

impl FieldType {
    /// Maps a column type as reported by the database onto a filter type.
    pub fn from_db_type(db_type: &str) -> Option<FieldType> {
        let normalized = db_type.trim().to_lowercase();
        let field_type = match normalized.as_str() {
            "text" | "varchar" | "character varying" | "char" | "string" => FieldType::Text,
            "number" | "integer" | "bigint" | "numeric" | "decimal" | "real"
            | "double precision" | "float" | "smallint" => FieldType::Number,
            "date" | "timestamp" | "timestamp without time zone" | "timestamp with time zone"
            | "time" => FieldType::Date,
            "boolean" | "bool" => FieldType::Boolean,
            _ => return None,
        };
        Some(field_type)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::from_db_type(s).ok_or_else(|| format!("unknown field type {:?}", s))
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field type or operator as spelled in stored criteria or a catalog.
///
/// Spellings this version does not recognise are kept as they are, so one odd
/// condition surfaces as a validation error instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "String",
    into = "String",
    bound(serialize = "T: fmt::Display + Clone", deserialize = "T: FromStr")
)]
pub enum Spelling<T> {
    Known(T),
    Unknown(String),
}

impl<T: Copy> Spelling<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Spelling::Known(value) => Some(*value),
            Spelling::Unknown(_) => None,
        }
    }
}

impl<T: FromStr> From<String> for Spelling<T> {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(value) => Spelling::Known(value),
            Err(_) => Spelling::Unknown(raw),
        }
    }
}

impl<T: fmt::Display> From<Spelling<T>> for String {
    fn from(spelling: Spelling<T>) -> Self {
        spelling.to_string()
    }
}

impl<T: fmt::Display> fmt::Display for Spelling<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spelling::Known(value) => write!(f, "{}", value),
            Spelling::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub fn keyword(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// A condition's comparison value. Dates travel as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn number(value: i64) -> Self {
        FilterValue::Number(value.into())
    }

    /// Empty strings count as "no value".
    pub fn is_blank(&self) -> bool {
        matches!(self, FilterValue::Text(s) if s.is_empty())
    }

    pub fn is_date(&self) -> bool {
        match self {
            FilterValue::Text(s) => parse_date(s).is_some(),
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Bool(b) => *b,
            FilterValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            FilterValue::Text(s) => !s.is_empty() && s != "false",
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parses the date spellings the filter builder produces.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub field_name: String,
    pub field_type: Spelling<FieldType>,
    pub operator: Spelling<Operator>,
    #[serde(default)]
    pub value: Option<FilterValue>,
    #[serde(default)]
    pub condition_order: i64,
}

impl FilterCondition {
    pub fn new(
        field_name: impl Into<String>,
        field_type: FieldType,
        operator: Operator,
        value: FilterValue,
    ) -> Self {
        Self {
            id: None,
            field_name: field_name.into(),
            field_type: Spelling::Known(field_type),
            operator: Spelling::Known(operator),
            value: Some(value),
            condition_order: 0,
        }
    }

    /// A fresh condition as the builder creates it: no field, `==`, empty value.
    pub fn blank(id: impl Into<String>, condition_order: i64) -> Self {
        Self {
            id: Some(id.into()),
            field_name: String::new(),
            field_type: Spelling::Known(FieldType::Text),
            operator: Spelling::Known(Operator::Eq),
            value: Some(FilterValue::Text(String::new())),
            condition_order,
        }
    }

    /// Conditions without a field or without a value are left out of compilation.
    pub fn is_complete(&self) -> bool {
        !self.field_name.trim().is_empty() && self.value.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub logic: Logic,
    #[serde(default)]
    pub group_order: i64,
}

impl FilterGroup {
    pub fn new(id: impl Into<String>, logic: Logic, conditions: Vec<FilterCondition>) -> Self {
        Self {
            id: id.into(),
            conditions,
            logic,
            group_order: 0,
        }
    }

    /// Conditions sorted by `condition_order` (stable for ties).
    pub fn ordered_conditions(&self) -> Vec<&FilterCondition> {
        let mut conditions: Vec<&FilterCondition> = self.conditions.iter().collect();
        conditions.sort_by_key(|c| c.condition_order);
        conditions
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterEditError {
    #[error("Filter group {0} does not exist")]
    GroupNotFound(String),

    #[error("Condition {condition} does not exist in group {group}")]
    ConditionNotFound { group: String, condition: String },

    #[error("A filter needs at least one group")]
    LastGroup,
}
