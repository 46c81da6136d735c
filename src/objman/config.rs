use crate::error::{ObjmanError, Result};
use crate::filter::{CompileOptions, PlaceholderStyle};
use crate::model::Width;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "objman.json";

pub const CONFIG_KEYS: [&str; 4] = [
    "placeholder_style",
    "case_insensitive_like",
    "table_alias",
    "default_width",
];

/// Configuration for objman, stored in `<data dir>/objman.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ObjmanConfig {
    /// Positional placeholder syntax for compiled predicates (`$1` or `?`)
    #[serde(default)]
    pub placeholder_style: PlaceholderStyle,

    /// Compile pattern operators to ILIKE / NOT ILIKE instead of LIKE / NOT LIKE
    #[serde(default)]
    pub case_insensitive_like: bool,

    /// Qualifier for column references in compiled predicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_alias: Option<String>,

    /// Width given to blocks added without an explicit width
    #[serde(default)]
    pub default_width: Width,
}

impl ObjmanConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ObjmanConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            table_alias: self.table_alias.clone(),
            placeholder: self.placeholder_style,
            case_insensitive_like: self.case_insensitive_like,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "placeholder_style" => match self.placeholder_style {
                PlaceholderStyle::Dollar => "dollar".to_string(),
                PlaceholderStyle::Question => "question".to_string(),
            },
            "case_insensitive_like" => self.case_insensitive_like.to_string(),
            "table_alias" => self.table_alias.clone().unwrap_or_default(),
            "default_width" => match self.default_width {
                Width::Half => "half".to_string(),
                Width::Full => "full".to_string(),
            },
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || ObjmanError::Config(format!("Invalid value for {}: {}", key, value));
        match key {
            "placeholder_style" => {
                self.placeholder_style = match value.trim().to_lowercase().as_str() {
                    "dollar" | "$" => PlaceholderStyle::Dollar,
                    "question" | "?" => PlaceholderStyle::Question,
                    _ => return Err(invalid()),
                }
            }
            "case_insensitive_like" => {
                self.case_insensitive_like = value.trim().parse().map_err(|_| invalid())?
            }
            "table_alias" => {
                let alias = value.trim();
                if !alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(invalid());
                }
                self.table_alias = (!alias.is_empty()).then(|| alias.to_string());
            }
            "default_width" => {
                self.default_width = match value.trim().to_lowercase().as_str() {
                    "half" => Width::Half,
                    "full" => Width::Full,
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(ObjmanError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}
