//! Board configuration
//!
//! Where the record service lives and the persisted unassigned-column
//! preference. Stored as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoardError, Result};

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "KANBAN_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub api_base_url: String,
    pub show_unassigned: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            show_unassigned: false,
        }
    }
}

impl BoardConfig {
    /// Load from `path`, falling back to defaults when the file doesn't exist.
    /// `KANBAN_API_URL` wins over the stored URL.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                debug!(%url, "service URL taken from environment");
                config.api_base_url = url;
            }
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BoardError::config(format!("{}: {}", path.display(), e)))
    }

    /// Save to `path`, creating parent directories if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// `<config dir>/kanban-board/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("kanban-board").join("config.json"))
        .ok_or_else(|| BoardError::config("no config directory on this platform"))
}
