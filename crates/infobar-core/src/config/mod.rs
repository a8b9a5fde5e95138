//! Configuration management for infobar.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field, so a missing file or a partial file is always valid.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Processing settings
    pub processing: ProcessingConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Fonts and logos
    pub assets: AssetsConfig,

    /// Fallback strings
    pub labels: LabelsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.infobar.infobar/config.toml
    /// - Linux: ~/.config/infobar/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\infobar\config\config.toml
    ///
    /// Falls back to ~/.infobar/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "infobar", "infobar")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".infobar").join("config.toml")
            })
    }

    /// Resolved logo directory (with ~ expansion).
    pub fn logo_dir(&self) -> PathBuf {
        expand(&self.assets.logo_dir)
    }

    /// Resolved font paths in role order: summary, model, timestamp, signature.
    pub fn font_paths(&self) -> [PathBuf; 4] {
        let fonts = &self.assets.fonts;
        [
            expand(&fonts.summary),
            expand(&fonts.model),
            expand(&fonts.timestamp),
            expand(&fonts.signature),
        ]
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Re-run range checks after CLI overrides were applied.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
