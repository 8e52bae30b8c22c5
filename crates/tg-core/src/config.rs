// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves layout and session settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Direction;

/// Layout engine behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Make the pane created by a split the active one
    pub focus_new_pane: bool,

    /// Maximum number of panes remembered for focus fallback (0 = unbounded)
    pub history_limit: usize,

    /// Direction used when a split command names none
    pub default_split: Direction,

    /// Validate tree invariants after every mutation (debug builds only)
    pub check_invariants: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            focus_new_pane: true,
            history_limit: 64,
            default_split: Direction::Right,
            check_invariants: true,
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionSettings {
    /// Restore the previous layout when the host starts
    pub restore_on_start: bool,

    /// Session file location, overriding the platform state directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutSettings,
    pub session: SessionSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/tabgrid/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tabgrid").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
