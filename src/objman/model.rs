use crate::error::{ObjmanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// System section holding record fields. Always present, never renamed or removed.
pub const DETAILS_SECTION: &str = "details";
/// System section holding related lists. Always present, never renamed or removed.
pub const RELATED_LISTS_SECTION: &str = "related_lists";
/// Pseudo-section for buttons. It is not part of the section order.
pub const HEADER_SECTION: &str = "header";

pub const RESERVED_SECTIONS: [&str; 2] = [DETAILS_SECTION, RELATED_LISTS_SECTION];

/// Section names are compared case-insensitively and without surrounding whitespace.
pub fn normalize_section_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn is_reserved_section(name: &str) -> bool {
    RESERVED_SECTIONS.contains(&name)
}

/// Tenant every store call is scoped to.
///
/// Tenant ids end up as directory names in the file store, so only ASCII
/// alphanumerics, `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ObjmanError::InvalidTenant(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Field,
    RelatedList,
    Mixed,
}

impl SectionType {
    /// Whether a block of `kind` may be placed in a section of this type.
    /// Buttons never go into ordinary sections.
    pub fn accepts(self, kind: BlockKind) -> bool {
        matches!(
            (self, kind),
            (SectionType::Mixed, BlockKind::Field | BlockKind::RelatedList)
                | (SectionType::Field, BlockKind::Field)
                | (SectionType::RelatedList, BlockKind::RelatedList)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Field => "field",
            SectionType::RelatedList => "related_list",
            SectionType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Field,
    RelatedList,
    Button,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Field => "field",
            BlockKind::RelatedList => "related_list",
            BlockKind::Button => "button",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    #[default]
    Half,
    Full,
}

/// What a block points at in the field / related-list / button catalog.
///
/// Display columns only exist on related lists, so they live on that variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "block_type", rename_all = "snake_case")]
pub enum BlockContent {
    Field {
        field_id: String,
    },
    RelatedList {
        related_list_id: String,
        #[serde(default)]
        display_columns: Vec<String>,
    },
    Button {
        button_id: String,
    },
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Field { .. } => BlockKind::Field,
            BlockContent::RelatedList { .. } => BlockKind::RelatedList,
            BlockContent::Button { .. } => BlockKind::Button,
        }
    }

    pub fn reference_id(&self) -> &str {
        match self {
            BlockContent::Field { field_id } => field_id,
            BlockContent::RelatedList {
                related_list_id, ..
            } => related_list_id,
            BlockContent::Button { button_id } => button_id,
        }
    }
}

/// A block placed in a page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutBlock {
    pub id: Uuid,
    pub content: BlockContent,
    pub label: String,
    pub section: String,
    pub order: usize,
    pub width: Width,
    pub visible: bool,
}

impl LayoutBlock {
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn reference_id(&self) -> &str {
        self.content.reference_id()
    }
}

/// A block that has not been placed yet: no id, no section, no order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDraft {
    #[serde(flatten)]
    pub content: BlockContent,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl BlockDraft {
    pub fn new(content: BlockContent, label: impl Into<String>) -> Self {
        Self {
            content,
            label: label.into(),
            width: None,
            visible: true,
        }
    }

    pub fn field(field_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            BlockContent::Field {
                field_id: field_id.into(),
            },
            label,
        )
    }

    pub fn related_list(
        related_list_id: impl Into<String>,
        label: impl Into<String>,
        display_columns: Vec<String>,
    ) -> Self {
        Self::new(
            BlockContent::RelatedList {
                related_list_id: related_list_id.into(),
                display_columns,
            },
            label,
        )
    }

    pub fn button(button_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            BlockContent::Button {
                button_id: button_id.into(),
            },
            label,
        )
    }

    pub fn with_width(mut self, width: Width) -> Self {
        self.width = Some(width);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }
}

/// Where a reference field points and which column labels its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMetadata {
    pub target_object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
}

/// A field, related list or button that can be placed on a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub api_name: String,
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_columns: Vec<String>,
}

impl CatalogEntry {
    /// The draft the palette produces when this entry is dragged onto a layout.
    pub fn draft(&self) -> BlockDraft {
        let content = match self.kind {
            BlockKind::Field => BlockContent::Field {
                field_id: self.id.clone(),
            },
            BlockKind::RelatedList => BlockContent::RelatedList {
                related_list_id: self.id.clone(),
                display_columns: self.display_columns.clone(),
            },
            BlockKind::Button => BlockContent::Button {
                button_id: self.id.clone(),
            },
        };
        BlockDraft::new(content, self.display_name.clone())
    }
}
