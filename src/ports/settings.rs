use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    ReadError(String),
    #[error("Failed to write settings: {0}")]
    WriteError(String),
    #[error("Settings are corrupted: {0}")]
    Corrupted(String),
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the OS preference
    #[default]
    System,
}

impl Theme {
    /// Flip between light and dark, resolving `System` against `system_is_dark`
    pub fn toggled(&self, system_is_dark: bool) -> Theme {
        let is_dark = match self {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => system_is_dark,
        };
        if is_dark {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(SettingsError::UnknownTheme(other.to_string())),
        }
    }
}

/// Persisted UI preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub theme: Theme,
    pub reduce_motion: bool,
    pub sidebar_pinned: bool,
}

/// Storage for UI preferences. A missing store loads defaults.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsRepository {
    fn load(&self) -> Result<UiSettings, SettingsError>;
    fn save(&self, settings: &UiSettings) -> Result<(), SettingsError>;
}
