//! Configuration file management
//!
//! This module handles loading and saving the user preferences record,
//! which includes the secret word, the notification/visibility toggles and
//! the interface language. The record is always written whole.

use crate::config;
use crate::constants::{APP_DIR_NAME, CONFIG_FILE_PERMISSIONS, CONFIG_PERMISSION_MASK_GROUP_OTHER};
use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Application configuration stored in config.json
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "StoredConfig")]
pub struct Config {
    /// Secret word; empty disables code generation
    pub secret: String,
    /// Show a desktop notification when the code changes
    pub notifications_enabled: bool,
    /// Show the code in the label and the countdown wedge in the glyph
    pub glyph_visible: bool,
    /// Interface language
    pub language: Language,
    /// Last displayed code, seeds change detection after a restart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_code: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: String::new(),
            notifications_enabled: true,
            glyph_visible: true,
            language: Language::default(),
            last_code: None,
        }
    }
}

/// On-disk shape of [`Config`]. Every key is optional, and the legacy
/// `code_visible` key is read alongside `glyph_visible` (which wins).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredConfig {
    secret: String,
    notifications_enabled: Option<bool>,
    glyph_visible: Option<bool>,
    code_visible: Option<bool>,
    language: Option<Language>,
    last_code: Option<String>,
}

impl From<StoredConfig> for Config {
    fn from(stored: StoredConfig) -> Self {
        let defaults = Config::default();
        Self {
            secret: stored.secret,
            notifications_enabled: stored
                .notifications_enabled
                .unwrap_or(defaults.notifications_enabled),
            glyph_visible: stored
                .glyph_visible
                .or(stored.code_visible)
                .unwrap_or(defaults.glyph_visible),
            language: stored.language.unwrap_or(defaults.language),
            last_code: stored.last_code,
        }
    }
}

impl Config {
    /// Store a new secret word, stripping surrounding whitespace
    pub fn set_secret(&mut self, raw: &str) {
        self.secret = raw.trim().to_string();
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }
}

/// Location and persistence of the [`Config`] record
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at SLOTCODE_CONFIG if set, otherwise the standard location
    pub fn from_env() -> Self {
        Self::new(config::config_path_override().unwrap_or_else(Self::default_path))
    }

    /// Get the standard config file path
    ///
    /// - macOS: `~/Library/Application Support/slotcode/config.json`
    /// - Linux: `~/.config/slotcode/config.json`
    /// - Windows: `%APPDATA%\slotcode\config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME)
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config file doesn't exist
    /// - Failed to read file
    /// - JSON parsing fails
    pub fn load(&self) -> Result<Config> {
        let path = &self.path;
        if !path.exists() {
            anyhow::bail!("Configuration file not found at: {}", path.display());
        }

        // Check file permissions (warning if too permissive)
        #[cfg(unix)]
        {
            let metadata = fs::metadata(path).context("Failed to read config file metadata")?;
            let mode = metadata.permissions().mode();

            if mode & CONFIG_PERMISSION_MASK_GROUP_OTHER != 0 {
                log::warn!(
                    "Config file has permissive permissions: {:o}. Should be 600 (user read/write only).",
                    mode & 0o777
                );
            }
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents).context("Failed to parse config file")
    }

    /// Load the record, substituting defaults for a missing or broken file
    pub fn load_or_default(&self) -> Config {
        if !self.path.exists() {
            log::info!(
                "No configuration at {}, starting with defaults",
                self.path.display()
            );
            return Config::default();
        }

        match self.load() {
            Ok(config) => {
                log::info!("Configuration loaded from: {}", self.path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring unreadable configuration: {:#}", e);
                Config::default()
            }
        }
    }

    /// Persist the whole record
    ///
    /// Creates the config directory if it doesn't exist, writes through a
    /// sibling temp file and renames it over the old record.
    /// Sets file permissions to 600 (user read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        let path = &self.path;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write config file: {}", tmp_path.display()))?;

        #[cfg(unix)]
        {
            let mut permissions = fs::metadata(&tmp_path)?.permissions();
            permissions.set_mode(CONFIG_FILE_PERMISSIONS);
            fs::set_permissions(&tmp_path, permissions)
                .context("Failed to set config file permissions")?;
        }

        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace config file: {}", path.display()))?;

        log::info!("Configuration saved to: {}", path.display());
        Ok(())
    }
}
