//! # Storage Layer
//!
//! The engines never do I/O. Persisted layouts, object catalogs and record lists
//! reach them through the [`MetadataStore`] trait.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: JSON documents on disk, one directory per tenant
//! - [`memory::InMemoryStore`]: no persistence, used by tests
//!
//! ## Tenancy
//!
//! Every call takes a [`TenantId`]. There is no ambient "current tenant"; the
//! caller decides which tenant it acts for and passes it along.
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <root>/
//! ├── objman.json                  # Configuration
//! └── <tenant>/
//!     ├── layouts/<object>.json    # LayoutSnapshot (or a bare block list)
//!     ├── catalogs/<object>.json   # ObjectCatalog
//!     └── lists/<list>.json        # RecordList with its filter criteria
//! ```

use crate::error::{ObjmanError, Result};
use crate::filter::{FilterExpression, FilterField, FilterFieldCatalog};
use crate::layout::LayoutSnapshot;
use crate::model::{CatalogEntry, TenantId};
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

/// Everything the surrounding application knows about one object type: what can
/// be placed on its layout and what its record lists can be filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectCatalog {
    #[serde(default)]
    pub items: Vec<CatalogEntry>,
    #[serde(default)]
    pub filter_fields: Vec<FilterField>,
}

impl ObjectCatalog {
    pub fn filter_catalog(&self) -> FilterFieldCatalog {
        FilterFieldCatalog::new(self.filter_fields.clone())
    }
}

/// A saved view over the records of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordList {
    pub name: String,
    pub object_id: String,
    #[serde(default)]
    pub filter_criteria: FilterExpression,
    #[serde(default)]
    pub selected_fields: Vec<String>,
}

/// Abstract interface for metadata storage.
pub trait MetadataStore {
    fn load_layout(&self, tenant: &TenantId, object: &str) -> Result<LayoutSnapshot>;

    fn save_layout(&mut self, tenant: &TenantId, object: &str, snapshot: &LayoutSnapshot) -> Result<()>;

    fn load_catalog(&self, tenant: &TenantId, object: &str) -> Result<ObjectCatalog>;

    fn load_record_list(&self, tenant: &TenantId, list: &str) -> Result<RecordList>;

    fn save_record_list(&mut self, tenant: &TenantId, list: &str, record_list: &RecordList) -> Result<()>;
}

/// Object and list ids become file names, so they follow the tenant id rules.
pub(crate) fn check_key(kind: &str, key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ObjmanError::Api(format!("Invalid {} id: {:?}", kind, key)))
    }
}
