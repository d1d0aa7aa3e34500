use crate::commands::{CmdMessage, CmdResult};
use crate::config::{DropsConfig, KEYS};
use crate::error::{DropsError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = DropsConfig::load(config_dir)?;
    let mut result = CmdResult::default();
    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::ShowKey(key) => {
            let value = config
                .get(&key)
                .ok_or_else(|| DropsError::Config(unknown_key(&key)))?;
            result.add_message(CmdMessage::info(value));
            return Ok(result);
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(config_dir)?;
            let shown = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
        }
    }
    result.config = Some(config);
    Ok(result)
}

fn unknown_key(key: &str) -> String {
    format!("unknown key: {} (expected one of: {})", key, KEYS.join(", "))
}
