//! User configuration and the remembered root directory

use crate::domain::RootStore;
use crate::error::{NweatError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserConfig {
    /// Root directory opened most recently
    #[serde(default)]
    pub last_root: Option<PathBuf>,
    /// When that root was opened
    #[serde(default)]
    pub last_opened: Option<DateTime<Utc>>,
}

impl UserConfig {
    /// Get the config file path (~/.config/nweat/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nweat").join("config.json"))
    }

    /// Load config from `path`, or return the default if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            NweatError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents)
            .map_err(|e| NweatError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                NweatError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            NweatError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            NweatError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}

/// A [`UserConfig`] bound to the file it lives in
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    config: UserConfig,
}

impl ConfigFile {
    /// Opens the config at the default location
    pub fn open_default() -> Result<Self> {
        let path = UserConfig::config_path().ok_or_else(|| {
            NweatError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::open(path)
    }

    pub fn open(path: PathBuf) -> Result<Self> {
        let config = UserConfig::load_from(&path)?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &UserConfig {
        &self.config
    }
}

impl RootStore for ConfigFile {
    fn remember_root(&mut self, root: &Path) -> Result<()> {
        self.config.last_root = Some(root.to_path_buf());
        self.config.last_opened = Some(Utc::now());
        self.config.save_to(&self.path)
    }

    fn recall_root(&self) -> Result<Option<PathBuf>> {
        Ok(self.config.last_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(config.last_root.is_none());
        assert!(config.last_opened.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = UserConfig {
            last_root: Some(PathBuf::from("/photos")),
            last_opened: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: UserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_missing_fields_default() {
        let deserialized: UserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(deserialized, UserConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = UserConfig::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(NweatError::ConfigError(_))));
    }

    #[test]
    fn test_config_file_remembers_root() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut store = ConfigFile::open(path.clone()).unwrap();
        assert_eq!(store.recall_root().unwrap(), None);

        store.remember_root(Path::new("/photos/2024")).unwrap();

        let reopened = ConfigFile::open(path).unwrap();
        assert_eq!(
            reopened.recall_root().unwrap(),
            Some(PathBuf::from("/photos/2024"))
        );
        assert!(reopened.config().last_opened.is_some());
    }
}
