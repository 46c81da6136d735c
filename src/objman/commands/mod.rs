//! # Command Layer
//!
//! Commands load what they need from a [`crate::store::MetadataStore`], run the
//! pure engines from [`crate::layout`] and [`crate::filter`], persist the outcome
//! when there is one, and describe what happened in a [`CmdResult`]. They never
//! print; rendering is the CLI's job.

use crate::config::ObjmanConfig;
use crate::error::{ObjmanError, Result};
use crate::filter::{CompiledPredicate, FilterExpression, ValidationResult};
use crate::layout::LayoutModel;
use crate::model::{CatalogEntry, TenantId};
use crate::store::MetadataStore;
use tracing::info;

pub mod config;
pub mod filter;
pub mod layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub layout: Option<LayoutModel>,
    pub palette: Vec<CatalogEntry>,
    pub filters: Option<FilterExpression>,
    pub validation: Option<ValidationResult>,
    pub compiled: Option<CompiledPredicate>,
    pub description: Option<String>,
    pub config: Option<ObjmanConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_layout(mut self, layout: LayoutModel) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_palette(mut self, palette: Vec<CatalogEntry>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_filters(mut self, filters: FilterExpression) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_validation(mut self, validation: ValidationResult) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_compiled(mut self, compiled: CompiledPredicate) -> Self {
        self.compiled = Some(compiled);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_config(mut self, config: ObjmanConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }
}

/// Loads and hydrates the stored layout. An object without a stored layout
/// starts from an empty one.
pub(crate) fn load_layout<S: MetadataStore>(
    store: &S,
    tenant: &TenantId,
    object: &str,
) -> Result<(LayoutModel, bool)> {
    match store.load_layout(tenant, object) {
        Ok(snapshot) => Ok((LayoutModel::hydrate(&snapshot)?, true)),
        Err(ObjmanError::LayoutNotFound { .. }) => {
            info!(%tenant, object, "no stored layout, starting empty");
            Ok((LayoutModel::new(), false))
        }
        Err(e) => Err(e),
    }
}
