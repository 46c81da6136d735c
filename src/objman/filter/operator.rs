//! Comparison operators and the field types they apply to.

use super::{FieldType, Spelling};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "NOT LIKE")]
    NotLike,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Like,
    Operator::NotLike,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
];

const ORDERED_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Ne];

/// Where `%` wildcards go around a pattern operator's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    None,
    Leading,
    Trailing,
    Both,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Like,
        Operator::NotLike,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// Operators the filter builder offers for a field type, in menu order.
    pub fn valid_for(field_type: FieldType) -> &'static [Operator] {
        match field_type {
            FieldType::Text => TEXT_OPERATORS,
            FieldType::Number | FieldType::Date => ORDERED_OPERATORS,
            FieldType::Boolean => BOOLEAN_OPERATORS,
        }
    }

    /// Like [`valid_for`](Self::valid_for), for a type as stored. Types this
    /// version does not recognise only get `==` and `!=`.
    pub fn valid_for_spelling(field_type: &Spelling<FieldType>) -> &'static [Operator] {
        match field_type.known() {
            Some(field_type) => Self::valid_for(field_type),
            None => BOOLEAN_OPERATORS,
        }
    }

    pub fn is_valid_for(self, field_type: FieldType) -> bool {
        Self::valid_for(field_type).contains(&self)
    }

    /// The wire spelling, as stored in filter criteria.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Operator::Eq => "equals",
            Operator::Ne => "not equals",
            Operator::Gt => "greater than",
            Operator::Lt => "less than",
            Operator::Gte => "greater than or equal to",
            Operator::Lte => "less than or equal to",
            Operator::Like => "contains",
            Operator::NotLike => "not contains",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
        }
    }

    pub fn is_pattern(self) -> bool {
        self.wildcard() != Wildcard::None
    }

    pub fn wildcard(self) -> Wildcard {
        match self {
            Operator::StartsWith => Wildcard::Trailing,
            Operator::EndsWith => Wildcard::Leading,
            Operator::Like | Operator::NotLike | Operator::Contains => Wildcard::Both,
            _ => Wildcard::None,
        }
    }

    /// SQL comparison keyword. Pattern operators use `LIKE`, or `ILIKE` when
    /// `case_insensitive` is set.
    pub fn sql_comparator(self, case_insensitive: bool) -> &'static str {
        match (self, case_insensitive) {
            (Operator::Eq, _) => "=",
            (Operator::Ne, _) => "!=",
            (Operator::Gt, _) => ">",
            (Operator::Lt, _) => "<",
            (Operator::Gte, _) => ">=",
            (Operator::Lte, _) => "<=",
            (Operator::NotLike, false) => "NOT LIKE",
            (Operator::NotLike, true) => "NOT ILIKE",
            (_, false) => "LIKE",
            (_, true) => "ILIKE",
        }
    }
}

impl Wildcard {
    pub fn apply(self, value: &str) -> String {
        match self {
            Wildcard::None => value.to_string(),
            Wildcard::Leading => format!("%{}", value),
            Wildcard::Trailing => format!("{}%", value),
            Wildcard::Both => format!("%{}%", value),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown operator {:?}", s))
    }
}
