use crate::layout::Rejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjmanError {
    #[error("Layout not found for object {object} (tenant {tenant})")]
    LayoutNotFound { tenant: String, object: String },

    #[error("Field catalog not found for object {object} (tenant {tenant})")]
    CatalogNotFound { tenant: String, object: String },

    #[error("Record list not found: {list} (tenant {tenant})")]
    RecordListNotFound { tenant: String, list: String },

    #[error("Invalid layout snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Layout change rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Invalid filter: {}", .0.join("; "))]
    InvalidFilter(Vec<String>),

    #[error("Filter edit failed: {0}")]
    FilterEdit(#[from] crate::filter::FilterEditError),

    #[error("Invalid tenant id: {0:?}")]
    InvalidTenant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ObjmanError>;
