//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.huskygpt/settings.json and uses them
//! as a fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::openai::params::CompletionOverrides;

/// Settings loaded from $HOME/.huskygpt/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Sampling parameter overrides.
    #[serde(default)]
    pub completion: CompletionOverrides,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".huskygpt").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
        assert_eq!(settings.completion, CompletionOverrides::default());
    }

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r####"{
            "env": {
                "HUSKYGPT_TEST_VAR": "test_value",
                "OPENAI_API_KEY": "sk-from-file"
            },
            "completion": {
                "model": "gpt-4o-mini",
                "max_tokens": 1024,
                "stop": ["###"]
            }
        }"####;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(settings.env.get("HUSKYGPT_TEST_VAR").unwrap(), "test_value");
        assert_eq!(settings.env.get("OPENAI_API_KEY").unwrap(), "sk-from-file");
        assert_eq!(settings.completion.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(settings.completion.max_tokens, Some(1024));
        assert_eq!(settings.completion.stop, Some(vec!["###".to_string()]));
        assert!(settings.completion.temperature.is_none());
    }

    #[test]
    fn settings_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        let err = Settings::load_from_path(&settings_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn settings_get_env_var() {
        let mut settings = Settings::default();
        settings.env.insert(
            "HUSKYGPT_SETTINGS_FALLBACK".to_string(),
            "file_value".to_string(),
        );

        // Environment takes precedence over the file
        env::set_var("HUSKYGPT_SETTINGS_FALLBACK", "env_override");
        assert_eq!(
            settings.get_env_var("HUSKYGPT_SETTINGS_FALLBACK").unwrap(),
            "env_override"
        );

        env::remove_var("HUSKYGPT_SETTINGS_FALLBACK");
        assert_eq!(
            settings.get_env_var("HUSKYGPT_SETTINGS_FALLBACK").unwrap(),
            "file_value"
        );

        assert!(settings.get_env_var("HUSKYGPT_SETTINGS_UNSET").is_none());
    }
}
