use crate::error::{DropsError, Result};
use crate::model::Privacy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_API_URL: &str = "https://api.droplr.com";

pub const HOME_ENV: &str = "DROPS_HOME";
pub const API_URL_ENV: &str = "DROPS_API_URL";
pub const TOKEN_ENV: &str = "DROPS_TOKEN";

/// Keys accepted by `drops config`, in display order.
pub const KEYS: &[&str] = &["api-url", "privacy", "board"];

/// Configuration for drops, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropsConfig {
    /// Base URL of the drop service API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Privacy applied to new drops unless overridden per command
    #[serde(default)]
    pub privacy: Privacy,

    /// Board name or id new drops go to unless overridden per command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for DropsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            privacy: Privacy::Public,
            board: None,
        }
    }
}

impl DropsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DropsConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies `DROPS_API_URL` on top of the stored value.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api-url" => Some(self.api_url.clone()),
            "privacy" => Some(self.privacy.to_string()),
            "board" => Some(self.board.clone().unwrap_or_default()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-url" => {
                let url = url::Url::parse(value)
                    .map_err(|e| DropsError::Config(format!("invalid api-url {}: {}", value, e)))?;
                self.api_url = url.as_str().trim_end_matches('/').to_string();
            }
            "privacy" => {
                self.privacy = Privacy::parse(value).ok_or_else(|| {
                    DropsError::Config(format!(
                        "privacy must be public or private, got {}",
                        value
                    ))
                })?;
            }
            "board" => {
                let value = value.trim();
                self.board = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            other => return Err(DropsError::Config(format!("unknown key: {}", other))),
        }
        Ok(())
    }
}

/// `$DROPS_HOME` if set, else the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("com", "drops", "drops")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| DropsError::Config("could not determine config directory".to_string()))
}
