//! Local key-value configuration
//!
//! Reads `~/.config/.local-config.yml` into a string-keyed map. A missing or
//! empty file is an empty config; a present but unreadable or invalid one is an
//! error.

use crate::error::{Error, Result};
use crate::fs::is_file;
use directories::BaseDirs;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location of the config file relative to the base directory
pub const CONFIG_FILE: &str = ".config/.local-config.yml";

/// Key holding the default GraphQL endpoint
pub const URL_KEY: &str = "gql_url";

/// Key holding the default `Authorization` header value
pub const AUTHORIZATION_KEY: &str = "gql_authorization";

/// String-keyed configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalConfig {
    values: HashMap<String, Value>,
}

impl LocalConfig {
    /// Load from the current user's home directory
    pub fn load_default() -> Result<Self> {
        let dirs = BaseDirs::new()
            .ok_or_else(|| Error::config("failed to get user home directory"))?;
        Self::load(dirs.home_dir())
    }

    /// Load `<basedir>/.config/.local-config.yml`
    pub fn load(basedir: impl AsRef<Path>) -> Result<Self> {
        let path = config_path(basedir.as_ref());
        if !is_file(&path) {
            debug!("no local config at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    /// Parse from YAML text; an empty document is an empty config
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let values: Option<HashMap<String, Value>> = serde_yaml::from_str(content)?;
        Ok(Self {
            values: values.unwrap_or_default(),
        })
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value for `key`, or `""` when missing or not a string
    pub fn get_string_or_empty(&self, key: &str) -> &str {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Check if no keys are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Path of the config file under `basedir`
pub fn config_path(basedir: &Path) -> PathBuf {
    basedir.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let config = LocalConfig::load(dir.path()).unwrap();
        assert!(config.is_empty());
        assert_eq!(config.get_string_or_empty(URL_KEY), "");
    }

    #[test]
    fn test_load_from_basedir() {
        let dir = tempdir().unwrap();
        let path = config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "gql_url: https://api.example.com/graphql\nretries: 3\nnested:\n  a: b\n",
        )
        .unwrap();

        let config = LocalConfig::load(dir.path()).unwrap();
        assert_eq!(
            config.get_string_or_empty(URL_KEY),
            "https://api.example.com/graphql"
        );
        assert_eq!(config.get_string_or_empty("retries"), "");
        assert_eq!(config.get_string_or_empty("nested"), "");
        assert_eq!(config.get_string_or_empty("absent"), "");
        assert!(config.get("retries").is_some());
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let dir = tempdir().unwrap();
        let path = config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "- just\n- a list\n").unwrap();

        let err = LocalConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_empty_document() {
        let config = LocalConfig::from_yaml("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_empty_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "\n  \n").unwrap();

        let config = LocalConfig::load(dir.path()).unwrap();
        assert!(config.is_empty());
        assert_eq!(config.get_string_or_empty(URL_KEY), "");
    }
}
