use super::{check_key, MetadataStore, ObjectCatalog, RecordList};
use crate::error::{ObjmanError, Result};
use crate::layout::LayoutSnapshot;
use crate::model::TenantId;
use std::collections::HashMap;

type Key = (TenantId, String);

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    layouts: HashMap<Key, LayoutSnapshot>,
    catalogs: HashMap<Key, ObjectCatalog>,
    lists: HashMap<Key, RecordList>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_catalog(&mut self, tenant: &TenantId, object: &str, catalog: ObjectCatalog) {
        self.catalogs
            .insert((tenant.clone(), object.to_string()), catalog);
    }
}

impl MetadataStore for InMemoryStore {
    fn load_layout(&self, tenant: &TenantId, object: &str) -> Result<LayoutSnapshot> {
        self.layouts
            .get(&(tenant.clone(), object.to_string()))
            .cloned()
            .ok_or_else(|| ObjmanError::LayoutNotFound {
                tenant: tenant.to_string(),
                object: object.to_string(),
            })
    }

    fn save_layout(&mut self, tenant: &TenantId, object: &str, snapshot: &LayoutSnapshot) -> Result<()> {
        check_key("object", object)?;
        self.layouts
            .insert((tenant.clone(), object.to_string()), snapshot.clone());
        Ok(())
    }

    fn load_catalog(&self, tenant: &TenantId, object: &str) -> Result<ObjectCatalog> {
        self.catalogs
            .get(&(tenant.clone(), object.to_string()))
            .cloned()
            .ok_or_else(|| ObjmanError::CatalogNotFound {
                tenant: tenant.to_string(),
                object: object.to_string(),
            })
    }

    fn load_record_list(&self, tenant: &TenantId, list: &str) -> Result<RecordList> {
        self.lists
            .get(&(tenant.clone(), list.to_string()))
            .cloned()
            .ok_or_else(|| ObjmanError::RecordListNotFound {
                tenant: tenant.to_string(),
                list: list.to_string(),
            })
    }

    fn save_record_list(&mut self, tenant: &TenantId, list: &str, record_list: &RecordList) -> Result<()> {
        check_key("list", list)?;
        self.lists
            .insert((tenant.clone(), list.to_string()), record_list.clone());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::filter::{
        FieldType, FilterCondition, FilterExpression, FilterField, FilterGroup, FilterValue,
        Logic, Operator,
    };
    use crate::layout::LayoutModel;
    use crate::model::{BlockDraft, BlockKind, CatalogEntry, SectionType};

    pub const OBJECT: &str = "account";
    pub const LIST: &str = "acme_accounts";

    pub fn tenant() -> TenantId {
        TenantId::parse("acme").unwrap()
    }

    pub fn catalog() -> ObjectCatalog {
        let entry = |id: &str, name: &str, kind| CatalogEntry {
            id: id.to_string(),
            display_name: name.to_string(),
            api_name: id.trim_start_matches("f-").to_string(),
            kind,
            reference: None,
            display_columns: Vec::new(),
        };
        ObjectCatalog {
            items: vec![
                entry("f-name", "Name", BlockKind::Field),
                entry("f-revenue", "Annual Revenue", BlockKind::Field),
                entry("f-active", "Active", BlockKind::Field),
                entry("rl-contacts", "Contacts", BlockKind::RelatedList),
                entry("b-print", "Print", BlockKind::Button),
            ],
            filter_fields: vec![
                FilterField::new("name", FieldType::Text, "Account Name"),
                FilterField::new("annual_revenue__a", FieldType::Number, "Annual Revenue"),
                FilterField::new("is_active", FieldType::Boolean, "Active"),
                FilterField::new("created_at", FieldType::Date, "Created"),
            ],
        }
    }

    /// `details` holds Name, `related_lists` holds Contacts, plus an empty
    /// mixed `extras` section.
    pub fn layout() -> LayoutModel {
        LayoutModel::new()
            .add_block(BlockDraft::field("f-name", "Name"), "details")
            .and_then(|m| {
                m.add_block(
                    BlockDraft::related_list("rl-contacts", "Contacts", vec!["name".into()]),
                    "related_lists",
                )
            })
            .and_then(|m| m.create_section("extras", SectionType::Mixed))
            .unwrap()
    }

    /// Accounts whose name starts with "Acme" and that are active.
    pub fn record_list() -> RecordList {
        let mut name = FilterCondition::new(
            "name",
            FieldType::Text,
            Operator::StartsWith,
            FilterValue::text("Acme"),
        );
        name.id = Some("c1".into());
        let mut active = FilterCondition::new(
            "isActive",
            FieldType::Boolean,
            Operator::Eq,
            FilterValue::Bool(true),
        );
        active.id = Some("c2".into());
        RecordList {
            name: "Acme accounts".into(),
            object_id: OBJECT.into(),
            filter_criteria: FilterExpression::new(vec![
                FilterGroup::new("g1", Logic::And, vec![name]),
                FilterGroup {
                    group_order: 1,
                    ..FilterGroup::new("g2", Logic::And, vec![active])
                },
            ]),
            selected_fields: vec!["name".into()],
        }
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_catalog(mut self) -> Self {
            self.store.insert_catalog(&tenant(), OBJECT, catalog());
            self
        }

        pub fn with_layout(mut self) -> Self {
            self.store
                .save_layout(&tenant(), OBJECT, &layout().to_snapshot())
                .unwrap();
            self
        }

        pub fn with_record_list(mut self) -> Self {
            self.store
                .save_record_list(&tenant(), LIST, &record_list())
                .unwrap();
            self
        }

        /// Catalog, layout and record list for the `acme` tenant.
        pub fn seeded() -> Self {
            Self::new().with_catalog().with_layout().with_record_list()
        }
    }
}
