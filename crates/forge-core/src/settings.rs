//! Persistent application state: recent projects and theme
//!
//! Stored as `settings.yaml` in a config directory chosen by the caller.

use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.yaml";

/// Most recent entries kept in [`Settings::recent_projects`]
pub const MAX_RECENT_PROJECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    /// Most recent first, no duplicates
    pub recent_projects: Vec<PathBuf>,
    pub theme: Theme,
}

impl Settings {
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(SETTINGS_FILE)
    }

    /// Read settings from `config_dir`; a missing file yields the defaults
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = Self::path_in(config_dir);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ForgeError::io(&path, e)),
        };
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Settings =
            serde_yaml::from_str(&text).map_err(|source| ForgeError::Settings { path, source })?;
        settings.recent_projects.truncate(MAX_RECENT_PROJECTS);
        Ok(settings)
    }

    pub fn save(&self, config_dir: &Path) -> Result<()> {
        fs::create_dir_all(config_dir).map_err(|e| ForgeError::io(config_dir, e))?;
        let path = Self::path_in(config_dir);
        let text = serde_yaml::to_string(self).map_err(|source| ForgeError::Settings {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|e| ForgeError::io(&path, e))
    }

    /// Move `project` to the front of the recent list
    pub fn add_recent_project(&mut self, project: impl Into<PathBuf>) {
        let project = project.into();
        self.recent_projects.retain(|p| p != &project);
        self.recent_projects.insert(0, project);
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    pub fn clear_recent_projects(&mut self) {
        self.recent_projects.clear();
    }
}
