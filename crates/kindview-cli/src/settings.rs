//! Settings file and well-known paths

use anyhow::{Context, Result};
use kindview_client::config::{DEFAULT_ROOT, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "kindview";

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join(APP_DIR))
}

pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .context("Could not determine data directory")
        .map(|p| p.join(APP_DIR))
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// SQLite file holding the kind cache and the last query state
pub fn storage_file() -> Result<PathBuf> {
    data_dir().map(|p| p.join("kindview.db"))
}

pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("logs")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub query: QuerySettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Service root, e.g. `http://localhost:8080/db`
    pub root: String,
    pub timeout_secs: u64,
    /// Sent to the service as the page to come back to after logging in
    pub return_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            return_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Limit used when `--limit` is not given
    pub default_limit: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: "100".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub json_logs: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { json_logs: true }
    }
}

impl Settings {
    /// Settings from the default location, or defaults when there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON in {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
