//! The fields a record list can be filtered on.
//!
//! Field names reach us in several spellings: the builder sends camelCase, the
//! database reports snake_case, and custom columns may carry an `__a`/`_a` suffix.
//! The catalog resolves all of them to one entry, so callers never have to try
//! variants themselves.

use super::{FieldType, Spelling};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub field_name: String,
    pub field_type: Spelling<FieldType>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_filterable")]
    pub is_filterable: bool,
}

fn default_filterable() -> bool {
    true
}

impl FilterField {
    pub fn new(field_name: impl Into<String>, field_type: FieldType, display_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: Spelling::Known(field_type),
            display_name: display_name.into(),
            is_filterable: true,
        }
    }

    pub fn not_filterable(mut self) -> Self {
        self.is_filterable = false;
        self
    }

    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.field_name
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FilterField>", into = "Vec<FilterField>")]
pub struct FilterFieldCatalog {
    fields: Vec<FilterField>,
    index: HashMap<String, usize>,
}

impl FilterFieldCatalog {
    pub fn new(fields: Vec<FilterField>) -> Self {
        let mut index = HashMap::new();
        for (position, field) in fields.iter().enumerate() {
            index.entry(field.field_name.clone()).or_insert(position);
        }
        for (position, field) in fields.iter().enumerate() {
            index
                .entry(canonical_field_name(&field.field_name))
                .or_insert(position);
        }
        Self { fields, index }
    }

    /// Looks a field up by its exact name first, then by its canonical spelling.
    pub fn get(&self, name: &str) -> Option<&FilterField> {
        self.index
            .get(name)
            .or_else(|| self.index.get(&canonical_field_name(name)))
            .map(|&position| &self.fields[position])
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn filterable(&self) -> impl Iterator<Item = &FilterField> {
        self.fields.iter().filter(|f| f.is_filterable)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<FilterField>> for FilterFieldCatalog {
    fn from(fields: Vec<FilterField>) -> Self {
        Self::new(fields)
    }
}

impl From<FilterFieldCatalog> for Vec<FilterField> {
    fn from(catalog: FilterFieldCatalog) -> Self {
        catalog.fields
    }
}

/// snake_case, lowercased, with any custom-column suffix removed.
pub fn canonical_field_name(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    let mut previous_lower = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            if previous_lower {
                snake.push('_');
            }
            snake.push(ch.to_ascii_lowercase());
            previous_lower = false;
        } else {
            snake.push(ch);
            previous_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    for suffix in ["__a", "_a"] {
        if let Some(stripped) = snake.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return stripped.to_string();
            }
        }
    }
    snake
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FilterFieldCatalog {
        FilterFieldCatalog::new(vec![
            FilterField::new("name", FieldType::Text, "Account Name"),
            FilterField::new("annual_revenue__a", FieldType::Number, "Annual Revenue"),
            FilterField::new("created_at", FieldType::Date, "Created"),
            FilterField::new("notes", FieldType::Text, "").not_filterable(),
        ])
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_field_name("createdAt"), "created_at");
        assert_eq!(canonical_field_name("annual_revenue__a"), "annual_revenue");
        assert_eq!(canonical_field_name("region_a"), "region");
        assert_eq!(canonical_field_name("addressLine2"), "address_line2");
        assert_eq!(canonical_field_name("name"), "name");
    }

    #[test]
    fn lookup_resolves_spelling_variants() {
        let catalog = catalog();
        assert_eq!(catalog.get("createdAt").unwrap().field_name, "created_at");
        assert_eq!(catalog.get("annualRevenue").unwrap().field_name, "annual_revenue__a");
        assert_eq!(catalog.get("annual_revenue_a").unwrap().field_name, "annual_revenue__a");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn labels_and_filterability() {
        let catalog = catalog();
        assert_eq!(catalog.get("name").unwrap().label(), "Account Name");
        assert_eq!(catalog.get("notes").unwrap().label(), "notes");
        assert_eq!(catalog.filterable().count(), 3);
    }

    #[test]
    fn deserializes_from_field_list() {
        let catalog: FilterFieldCatalog = serde_json::from_str(
            r#"[{"field_name": "is_active", "field_type": "bool", "display_name": "Active"}]"#,
        )
        .unwrap();
        let field = catalog.get("isActive").unwrap();
        assert_eq!(field.field_type.known(), Some(FieldType::Boolean));
        assert!(field.is_filterable);
    }
}
