//! Settings and configuration utilities.
//!
//! Settings are read from $HOME/.gdc/settings.json and act as a fallback
//! for environment variables, so CI-style keys can be pinned locally.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from $HOME/.gdc/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,

    #[serde(skip)]
    ignore_process_env: bool,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path; a missing file yields empty settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".gdc").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    ///
    /// Empty environment values count as unset.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        let from_process = if self.ignore_process_env {
            None
        } else {
            env::var(key).ok()
        };
        self.resolve_env_var(key, from_process)
    }

    fn resolve_env_var(&self, key: &str, from_process: Option<String>) -> Option<String> {
        match from_process {
            Some(value) if !value.is_empty() => Some(value),
            _ => self.env.get(key).cloned(),
        }
    }

    /// Settings that only consult `env`, never the process environment.
    #[cfg(test)]
    pub(crate) fn without_process_env(mut self) -> Self {
        self.ignore_process_env = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "GDC_PROJECT_ROOT": "github.com/acme/widgets",
                "TRAVIS_COMMIT_RANGE": "abc...def"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(
            settings.env.get("GDC_PROJECT_ROOT").unwrap(),
            "github.com/acme/widgets"
        );
        assert_eq!(settings.env.get("TRAVIS_COMMIT_RANGE").unwrap(), "abc...def");
    }

    #[test]
    fn missing_settings_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        assert!(Settings::load_from_path(&settings_path).is_err());
    }

    #[test]
    fn environment_takes_precedence_over_settings() {
        let mut settings = Settings::default();
        settings
            .env
            .insert("GDC_TEST_SETTING".to_string(), "from_settings".to_string());

        assert_eq!(
            settings
                .resolve_env_var("GDC_TEST_SETTING", Some("from_env".to_string()))
                .unwrap(),
            "from_env"
        );
        assert_eq!(
            settings.resolve_env_var("GDC_TEST_SETTING", None).unwrap(),
            "from_settings"
        );
        // Empty values count as unset
        assert_eq!(
            settings
                .resolve_env_var("GDC_TEST_SETTING", Some(String::new()))
                .unwrap(),
            "from_settings"
        );
        assert!(settings.resolve_env_var("GDC_TEST_UNSET_SETTING", None).is_none());
    }

    #[test]
    fn detached_settings_ignore_process_environment() {
        let mut settings = Settings::default().without_process_env();
        settings
            .env
            .insert("TEST_SETTING_KEY".to_string(), "from_settings".to_string());

        // PATH is set in any test environment.
        assert!(settings.get_env_var("PATH").is_none());
        assert_eq!(
            settings.get_env_var("TEST_SETTING_KEY").unwrap(),
            "from_settings"
        );
    }
}
