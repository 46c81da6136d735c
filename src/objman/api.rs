//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all objman operations, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (tenant ids are parsed here, table aliases merged with config)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no business logic; layout and filter rules live
//! in the engines, persistence in the store.
//!
//! ## Generic Over MetadataStore
//!
//! `ObjmanApi<S: MetadataStore>` is generic over the storage backend:
//! - Production: `ObjmanApi<FileStore>`
//! - Testing: `ObjmanApi<InMemoryStore>`

use crate::commands::{self, config::ConfigAction, CmdResult};
use crate::config::ObjmanConfig;
use crate::error::Result;
use crate::filter::FilterEdit;
use crate::layout::LayoutCommand;
use crate::model::TenantId;
use crate::store::MetadataStore;
use std::path::PathBuf;

/// The main API facade for objman operations.
pub struct ObjmanApi<S: MetadataStore> {
    store: S,
    config: ObjmanConfig,
    config_dir: PathBuf,
}

impl<S: MetadataStore> ObjmanApi<S> {
    pub fn new(store: S, config_dir: PathBuf) -> Result<Self> {
        let config = ObjmanConfig::load(&config_dir)?;
        Ok(Self {
            store,
            config,
            config_dir,
        })
    }

    pub fn with_config(store: S, config_dir: PathBuf, config: ObjmanConfig) -> Self {
        Self {
            store,
            config,
            config_dir,
        }
    }

    pub fn config_ref(&self) -> &ObjmanConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn show_layout(&self, tenant: &str, object: &str) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::layout::show(&self.store, &tenant, object)
    }

    pub fn check_layout(&self, tenant: &str, object: &str) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::layout::check(&self.store, &tenant, object)
    }

    pub fn layout_palette(&self, tenant: &str, object: &str) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::layout::palette(&self.store, &tenant, object)
    }

    pub fn apply_layout(
        &mut self,
        tenant: &str,
        object: &str,
        layout_commands: &[LayoutCommand],
    ) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::layout::apply(
            &mut self.store,
            &tenant,
            object,
            layout_commands,
            self.config.default_width,
        )
    }

    pub fn validate_filters(&self, tenant: &str, list: &str) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::filter::validate(&self.store, &tenant, list)
    }

    /// `table_alias` overrides the configured alias for this call.
    pub fn compile_filters(
        &self,
        tenant: &str,
        list: &str,
        table_alias: Option<&str>,
    ) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        let mut options = self.config.compile_options();
        if let Some(alias) = table_alias {
            options = options.with_alias(alias);
        }
        commands::filter::compile(&self.store, &tenant, list, &options)
    }

    pub fn describe_filters(&self, tenant: &str, list: &str) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::filter::describe(&self.store, &tenant, list)
    }

    pub fn edit_filters(&mut self, tenant: &str, list: &str, edits: &[FilterEdit]) -> Result<CmdResult> {
        let tenant = TenantId::parse(tenant)?;
        commands::filter::edit(&mut self.store, &tenant, list, edits)
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.config_dir, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObjmanError;
    use crate::model::{BlockDraft, Width};
    use crate::store::memory::fixtures::{StoreFixture, LIST, OBJECT};
    use tempfile::tempdir;

    fn api() -> (ObjmanApi<crate::store::memory::InMemoryStore>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let api = ObjmanApi::new(StoreFixture::seeded().store, dir.path().to_path_buf()).unwrap();
        (api, dir)
    }

    #[test]
    fn tenant_ids_are_parsed() {
        let (api, _dir) = api();
        assert!(matches!(
            api.show_layout("../acme", OBJECT),
            Err(ObjmanError::InvalidTenant(_))
        ));
        assert!(api.show_layout("acme", OBJECT).unwrap().layout.is_some());
    }

    #[test]
    fn alias_argument_overrides_config() {
        let (mut api, _dir) = api();
        api.config(ConfigAction::Set("table_alias".into(), "cfg".into()))
            .unwrap();

        let configured = api.compile_filters("acme", LIST, None).unwrap();
        assert!(configured.compiled.unwrap().predicate.starts_with("(cfg.name"));

        let overridden = api.compile_filters("acme", LIST, Some("x")).unwrap();
        assert!(overridden.compiled.unwrap().predicate.starts_with("(x.name"));
    }

    #[test]
    fn configured_default_width_applies_to_new_blocks() {
        let (mut api, _dir) = api();
        api.config(ConfigAction::Set("default_width".into(), "full".into()))
            .unwrap();
        let result = api
            .apply_layout(
                "acme",
                OBJECT,
                &[LayoutCommand::AddBlock {
                    draft: BlockDraft::field("f-active", "Active"),
                    section: "details".into(),
                }],
            )
            .unwrap();
        let layout = result.layout.unwrap();
        assert_eq!(layout.blocks_in("details")[1].width, Width::Full);
    }

    #[test]
    fn describe_goes_through_catalog() {
        let (api, _dir) = api();
        let result = api.describe_filters("acme", LIST).unwrap();
        assert!(result.description.unwrap().starts_with("Account Name"));
    }
}
