use super::{check_key, MetadataStore, ObjectCatalog, RecordList};
use crate::error::{ObjmanError, Result};
use crate::layout::LayoutSnapshot;
use crate::model::TenantId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const LAYOUTS_DIR: &str = "layouts";
const CATALOGS_DIR: &str = "catalogs";
const LISTS_DIR: &str = "lists";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, tenant: &TenantId, dir: &str, key: &str) -> PathBuf {
        self.root
            .join(tenant.as_str())
            .join(dir)
            .join(format!("{}.json", key))
    }

    fn read_document(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match self.read_document(path)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "document written");
        Ok(())
    }
}

impl MetadataStore for FileStore {
    fn load_layout(&self, tenant: &TenantId, object: &str) -> Result<LayoutSnapshot> {
        check_key("object", object)?;
        let path = self.document_path(tenant, LAYOUTS_DIR, object);
        match self.read_document(&path)? {
            Some(content) => LayoutSnapshot::parse(&content),
            None => Err(ObjmanError::LayoutNotFound {
                tenant: tenant.to_string(),
                object: object.to_string(),
            }),
        }
    }

    fn save_layout(&mut self, tenant: &TenantId, object: &str, snapshot: &LayoutSnapshot) -> Result<()> {
        check_key("object", object)?;
        let path = self.document_path(tenant, LAYOUTS_DIR, object);
        self.write_json(&path, snapshot)
    }

    fn load_catalog(&self, tenant: &TenantId, object: &str) -> Result<ObjectCatalog> {
        check_key("object", object)?;
        let path = self.document_path(tenant, CATALOGS_DIR, object);
        self.read_json(&path)?
            .ok_or_else(|| ObjmanError::CatalogNotFound {
                tenant: tenant.to_string(),
                object: object.to_string(),
            })
    }

    fn load_record_list(&self, tenant: &TenantId, list: &str) -> Result<RecordList> {
        check_key("list", list)?;
        let path = self.document_path(tenant, LISTS_DIR, list);
        self.read_json(&path)?
            .ok_or_else(|| ObjmanError::RecordListNotFound {
                tenant: tenant.to_string(),
                list: list.to_string(),
            })
    }

    fn save_record_list(&mut self, tenant: &TenantId, list: &str, record_list: &RecordList) -> Result<()> {
        check_key("list", list)?;
        let path = self.document_path(tenant, LISTS_DIR, list);
        self.write_json(&path, record_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutModel;
    use crate::model::BlockDraft;
    use tempfile::tempdir;

    fn tenant(id: &str) -> TenantId {
        TenantId::parse(id).unwrap()
    }

    #[test]
    fn layout_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let model = LayoutModel::new()
            .add_block(BlockDraft::field("f-1", "Name"), "details")
            .unwrap();

        store
            .save_layout(&tenant("acme"), "account", &model.to_snapshot())
            .unwrap();
        assert!(dir.path().join("acme/layouts/account.json").exists());

        let loaded = store.load_layout(&tenant("acme"), "account").unwrap();
        assert_eq!(LayoutModel::hydrate(&loaded).unwrap(), model);
    }

    #[test]
    fn tenants_are_isolated() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store
            .save_layout(&tenant("acme"), "account", &LayoutSnapshot::default())
            .unwrap();

        let result = store.load_layout(&tenant("globex"), "account");
        assert!(matches!(result, Err(ObjmanError::LayoutNotFound { .. })));
    }

    #[test]
    fn bare_block_list_files_load() {
        let dir = tempdir().unwrap();
        let layouts = dir.path().join("acme").join("layouts");
        fs::create_dir_all(&layouts).unwrap();
        fs::write(
            layouts.join("account.json"),
            r#"[{"block_type": "field", "field_id": "f-1", "label": "Name", "section": "details", "display_order": 0}]"#,
        )
        .unwrap();

        let store = FileStore::new(dir.path());
        let snapshot = store.load_layout(&tenant("acme"), "account").unwrap();
        assert_eq!(snapshot.blocks.len(), 1);
        assert!(snapshot.sections.is_empty());
    }

    #[test]
    fn missing_documents_are_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.load_catalog(&tenant("acme"), "account"),
            Err(ObjmanError::CatalogNotFound { .. })
        ));
        assert!(matches!(
            store.load_record_list(&tenant("acme"), "open_deals"),
            Err(ObjmanError::RecordListNotFound { .. })
        ));
        assert!(store.load_layout(&tenant("acme"), "../secrets").is_err());
    }

    #[test]
    fn record_list_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let list = RecordList {
            name: "Open deals".into(),
            object_id: "deal".into(),
            filter_criteria: Default::default(),
            selected_fields: vec!["name".into()],
        };
        store.save_record_list(&tenant("acme"), "open_deals", &list).unwrap();
        assert_eq!(store.load_record_list(&tenant("acme"), "open_deals").unwrap(), list);
    }
}
