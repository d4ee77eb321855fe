use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::{FileSlot, SavePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    #[default]
    Immediate,
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the collection file lives (defaults to the platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Name of the persistence slot (file stem)
    pub slot_key: String,

    /// Save on every change, or batch changes made in quick succession
    pub save_policy: SaveMode,

    /// Batch window for `save_policy = "deferred"`
    pub save_delay_ms: u64,

    /// Desktop notifications for command-line changes
    pub notifications: bool,

    /// Command used to open links (xdg-open / open when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    /// kitty-style color file (`colorN #rrggbb` lines)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot_key: "websites".to_string(),
            save_policy: SaveMode::Immediate,
            save_delay_ms: 500,
            notifications: false,
            browser: None,
            theme_file: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("webcards");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, writing defaults if absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Ok(AppConfig::default()),
        }
    }

    /// Load config from `path`. Unreadable or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Leave a broken file alone so the user can fix it
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut clean_config = self.clone();
        if clean_config.slot_key.trim().is_empty() {
            clean_config.slot_key = AppConfig::default().slot_key;
        }
        if clean_config.browser.as_ref().map(|s| s.trim().is_empty()).unwrap_or(false) {
            clean_config.browser = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the collection file
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        self.data_dir
            .clone()
            .or_else(FileSlot::default_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))
    }

    /// Slot key, never empty and never containing a path separator
    pub fn slot_key(&self) -> String {
        let key: String = self
            .slot_key
            .trim()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        if key.is_empty() {
            AppConfig::default().slot_key
        } else {
            key
        }
    }

    pub fn save_policy(&self) -> SavePolicy {
        match self.save_policy {
            SaveMode::Immediate => SavePolicy::Immediate,
            SaveMode::Deferred => SavePolicy::Deferred {
                delay: Duration::from_millis(self.save_delay_ms),
            },
        }
    }
}
