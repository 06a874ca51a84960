//! JSON File Settings
//!
//! Persists UI preferences to a JSON file on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ports::settings::{SettingsError, SettingsRepository, UiSettings};

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository at `<data_dir>/settings.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DEFAULT_SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsRepository for JsonSettingsRepository {
    fn load(&self) -> Result<UiSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(UiSettings::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SettingsError::ReadError(e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(UiSettings::default());
        }

        let settings: UiSettings = serde_json::from_str(&content)
            .map_err(|e| SettingsError::Corrupted(e.to_string()))?;

        tracing::debug!("Settings loaded from {}", self.path.display());
        Ok(settings)
    }

    fn save(&self, settings: &UiSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::WriteError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| SettingsError::WriteError(e.to_string()))?;

        fs::write(&self.path, content)
            .map_err(|e| SettingsError::WriteError(e.to_string()))?;

        tracing::info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::settings::Theme;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSettingsRepository::in_dir(dir.path());
        assert_eq!(repo.load().unwrap(), UiSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSettingsRepository::new(dir.path().join("nested/ui/settings.json"));

        let settings = UiSettings {
            theme: Theme::Dark,
            reduce_motion: true,
            sidebar_pinned: true,
        };
        repo.save(&settings).unwrap();

        assert!(repo.path().exists());
        assert_eq!(repo.load().unwrap(), settings);
    }

    #[test]
    fn test_empty_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSettingsRepository::in_dir(dir.path());
        fs::write(repo.path(), "   ").unwrap();
        assert_eq!(repo.load().unwrap(), UiSettings::default());
    }

    #[test]
    fn test_corrupted_file() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSettingsRepository::in_dir(dir.path());
        fs::write(repo.path(), "{ not json").unwrap();
        assert!(matches!(repo.load(), Err(SettingsError::Corrupted(_))));
    }
}
