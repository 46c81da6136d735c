use crate::commands::{CmdMessage, CmdResult};
use crate::config::ObjmanConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = ObjmanConfig::load(config_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = ObjmanConfig::load(config_dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = ObjmanConfig::load(config_dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(config_dir)?;
            let display_val = config.get(&key).unwrap_or_else(|| value.clone());
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::tempdir;

    #[test]
    fn set_then_show_key() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("placeholder_style".into(), "question".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "placeholder_style set to question");

        let result = run(dir.path(), ConfigAction::ShowKey("placeholder_style".into())).unwrap();
        assert_eq!(result.messages[0].content, "question");
    }

    #[test]
    fn bad_values_are_reported_not_saved() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("default_width".into(), "wide".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("objman.json").exists());
    }

    #[test]
    fn show_all_returns_defaults() {
        let dir = tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(ObjmanConfig::default()));
    }
}
