//! Application configuration.
//!
//! Stored as JSON under `~/.superid/config.json`. Every field is optional
//! in the file; missing ones take their defaults.

use anyhow::{Context, Result};
use log::{LevelFilter, ParseLevelError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::crypto;
use crate::logging::LogConfig;
use crate::registration::DEFAULT_FAILURE_MESSAGE;

const APP_DIR: &str = ".superid";

/// Directory holding the vault, logs, history and config.
pub fn data_dir() -> PathBuf {
    match dirs_next::home_dir() {
        Some(home) => home.join(APP_DIR),
        None => PathBuf::from(APP_DIR),
    }
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vault_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: String,
    pub history_path: PathBuf,
    pub history_max_entries: usize,
    /// Identifier sent with every registration; generated on first run.
    pub device_id: Option<String>,
    /// Shown when a registration failure carries no message.
    pub unknown_error_message: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dir = data_dir();
        Self {
            vault_path: dir.join("vault.db"),
            log_path: dir.join("superid.log"),
            log_level: "info".to_string(),
            history_path: dir.join("history"),
            history_max_entries: 1000,
            device_id: None,
            unknown_error_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the config, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// Generates a device id if none is configured. Returns `true` when the
    /// config changed and should be saved.
    pub fn ensure_device_id(&mut self) -> Result<bool> {
        if self.device_id.as_deref().is_some_and(|id| !id.trim().is_empty()) {
            return Ok(false);
        }
        self.device_id = Some(crypto::random_token()?);
        Ok(true)
    }

    pub fn device_id(&self) -> &str {
        self.device_id.as_deref().unwrap_or_default()
    }

    /// The configured level, or the parse error for an unknown name.
    pub fn parse_level(&self) -> Result<LevelFilter, ParseLevelError> {
        LevelFilter::from_str(self.log_level.trim())
    }

    /// Unknown level names fall back to `Info`.
    pub fn level(&self) -> LevelFilter {
        self.parse_level().unwrap_or(LevelFilter::Info)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::new(self.log_path.clone()).with_level(self.level())
    }
}
