//! Configuration file loading

use super::source::ConfigSource;
use crate::error::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Flat key/value configuration loaded from a TOML file
///
/// ```toml
/// DM_DATA_API_URL = "https://api.example.com"
/// DM_DATA_API_AUTH_TOKEN = "token"
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    values: BTreeMap<String, String>,
    path: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let mut config = Self::from_toml_str(&content).map_err(|e| match e {
            ApiError::Config(msg) => {
                ApiError::config(format!("Failed to parse config file {}: {msg}", path.display()))
            }
            other => other,
        })?;
        config.path = Some(path.display().to_string());
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// Only top-level scalar values are kept; tables and arrays are ignored.
    pub fn from_toml_str(content: &str) -> ApiResult<Self> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ApiError::config(e.to_string()))?;

        let values = table
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => return None,
                };
                Some((key, value))
            })
            .collect();

        Ok(Self { values, path: None })
    }

    /// Path the configuration was loaded from, if any
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl ConfigSource for FileConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
