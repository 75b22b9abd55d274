use super::Result;
use crate::error::{ConfigError, StorageError};
use crate::utils::validation::validate_url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "shopline-cli";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Non-secret user preferences. Credentials never live here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub output: Option<String>,
    pub color: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub api_base_url: Option<String>,
    /// Short alias -> profile name, merged with SHOPLINE_STORE_ALIASES.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParse {
            message: format!("{}: {}", config_path.display(), e),
        })
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content =
            toml::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Config file inside an explicit directory (the `--config-dir` flag).
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Sets one key. Keys: output, color, timeout_seconds, api_base_url, alias.<name>.
    pub fn set_value(&mut self, key: &str, value: &str) -> crate::Result<()> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "output" => {
                if !matches!(value, "text" | "json") {
                    return Err(invalid("expected text or json").into());
                }
                self.output = Some(value.to_string());
            }
            "color" => {
                if !matches!(value, "auto" | "always" | "never") {
                    return Err(invalid("expected auto, always or never").into());
                }
                self.color = Some(value.to_string());
            }
            "timeout_seconds" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number of seconds"))?;
                if secs == 0 {
                    return Err(invalid("must be greater than zero").into());
                }
                self.timeout_seconds = Some(secs);
            }
            "api_base_url" => {
                validate_url(value)?;
                self.api_base_url = Some(value.trim_end_matches('/').to_string());
            }
            _ => match key.strip_prefix("alias.") {
                Some(alias) if !alias.is_empty() => {
                    let alias = alias.to_lowercase();
                    if value.is_empty() {
                        self.aliases.remove(&alias);
                    } else {
                        self.aliases.insert(alias, value.to_string());
                    }
                }
                _ => {
                    return Err(ConfigError::UnknownKey {
                        key: key.to_string(),
                    }
                    .into());
                }
            },
        }
        Ok(())
    }

    /// Flattened key/value view used by `config show`.
    pub fn entries(&self) -> Vec<(String, String)> {
        let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        let mut entries = vec![
            ("output".to_string(), show(self.output.clone())),
            ("color".to_string(), show(self.color.clone())),
            (
                "timeout_seconds".to_string(),
                show(self.timeout_seconds.map(|s| s.to_string())),
            ),
            ("api_base_url".to_string(), show(self.api_base_url.clone())),
        ];
        for (alias, profile) in &self.aliases {
            entries.push((format!("alias.{}", alias), profile.clone()));
        }
        entries
    }
}
