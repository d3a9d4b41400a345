//! Settings file for startup-layers.
//!
//! Stored at `~/.config/startup-layers/config.yaml` (platform config dir on
//! Windows/macOS). Every field is optional in the file.

use crate::error::ConfigError;
use crate::naming::STORAGE_SUBDIR;
use crate::types::{LogLevel, MenuPlacement};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Root directory that holds `storage/startup_layers`.
    /// `None` uses the editor's settings directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,

    /// Menu placement of the layout actions
    #[serde(default)]
    pub menu: MenuPlacement,

    /// Debug log verbosity
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Config {
    /// Get the settings file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("startup-layers")
            .join("config.yaml")
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific file.
    ///
    /// A missing or blank file yields the defaults; a corrupt file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse settings from {:?}", path))?;
        config.validate()?;

        log::info!("Loaded settings from {:?}", path);
        Ok(config)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self)
            .map_err(ConfigError::from)
            .context("Failed to serialize settings")?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write settings to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace settings file {:?}", path))?;

        log::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Reject values the menu integration cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.menu.menu.trim().is_empty() {
            return Err(ConfigError::Validation(
                "menu.menu must name an existing menu".to_string(),
            ));
        }
        if self.menu.before.trim().is_empty() {
            return Err(ConfigError::Validation(
                "menu.before must name an existing menu action".to_string(),
            ));
        }
        Ok(())
    }

    /// Root directory that contains `storage/startup_layers`.
    pub fn storage_root(&self) -> PathBuf {
        self.storage_root
            .clone()
            .unwrap_or_else(crate::defaults::storage_root)
    }

    /// Directory holding `options.ini` and the `.config` layout files.
    pub fn storage_dir(&self) -> PathBuf {
        storage_dir_under(&self.storage_root())
    }
}

/// `<root>/storage/startup_layers`
pub fn storage_dir_under(root: &Path) -> PathBuf {
    root.join("storage").join(STORAGE_SUBDIR)
}
