//! User settings
//!
//! Stored as JSON next to the other per-user config:
//! - Linux: ~/.config/photo-grid/settings.json
//! - macOS: ~/Library/Application Support/photo-grid/settings.json
//! - Windows: %APPDATA%\photo-grid\settings.json
//!
//! Every field is optional in the file. `FLICKR_API_KEY` overrides the key.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Environment variable that overrides `api_key`
pub const API_KEY_ENV: &str = "FLICKR_API_KEY";

/// Color theme of the window
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Flickr API key
    pub api_key: String,
    /// Photos requested per search
    pub per_page: u32,
    /// Thumbnails per grid row
    pub items_per_row: u32,
    /// Space above the first row of a section
    pub inset_top: f32,
    /// Space left and right of the grid, and between items
    pub inset_side: f32,
    /// Space below the last row of a section
    pub inset_bottom: f32,
    /// Height of the section header showing the search term
    pub header_height: f32,
    pub theme: ThemeChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            per_page: 20,
            items_per_row: 3,
            inset_top: 50.0,
            inset_side: 20.0,
            inset_bottom: 50.0,
            header_height: 50.0,
            theme: ThemeChoice::Dark,
        }
    }
}

impl Settings {
    /// Load settings from the default location, then apply the environment.
    /// A missing file gives the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(settings)
    }

    /// Read a settings file. A missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Override the API key with a non-empty environment value
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
    }

    /// Get the path where the settings file lives
    pub fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("photo-grid");
        path.push("settings.json");
        Some(path)
    }
}
