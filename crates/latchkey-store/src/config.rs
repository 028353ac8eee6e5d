//! Latchkey configuration persistence
//!
//! Grid geometry, hasher choice and the data directory. Command-line flags
//! in the front end override whatever is loaded here.

use std::fs;
use std::path::{Path, PathBuf};

use latchkey_core::GridLayout;
use serde::{Deserialize, Serialize};

use crate::hasher::HasherKind;

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name under the config and data roots
const APP_DIR_NAME: &str = "latchkey";

const CREDENTIALS_FILE_NAME: &str = "credentials.json";
const PREFERENCES_FILE_NAME: &str = "preferences.json";
const LOG_FILE_NAME: &str = "latchkey.log";

/// User configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatchkeyConfig {
    /// Where credentials, preferences and logs live
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Pattern grid geometry
    #[serde(default)]
    pub grid: GridLayout,

    /// Hashing backend for newly created credential files
    #[serde(default)]
    pub hasher: HasherKind,
}

impl LatchkeyConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(APP_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns the default configuration if the file doesn't exist or can't
    /// be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Resolved data directory
    ///
    /// The configured directory if set, else `<data_dir>/latchkey`.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    pub fn credentials_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(CREDENTIALS_FILE_NAME))
    }

    pub fn preferences_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(PREFERENCES_FILE_NAME))
    }

    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(LOG_FILE_NAME))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
