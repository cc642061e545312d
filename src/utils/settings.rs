//! Settings and configuration utilities.
//!
//! Settings are read from $HOME/.omni-ci/settings.json and used as a
//! fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from $HOME/.omni-ci/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    ///
    /// A missing file yields empty settings.
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

        Ok(home_dir.join(".omni-ci").join("settings.json"))
    }
}

/// Returns an environment variable with fallback to the settings file.
pub fn get_env_var(key: &str) -> Result<String> {
    if let Ok(value) = env::var(key) {
        return Ok(value);
    }

    let settings = Settings::load()
        .map_err(|err| anyhow::anyhow!("Environment variable not found: {key}").context(err))?;

    settings
        .env
        .get(key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Environment variable not found: {key}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(
            &settings_path,
            r#"{ "env": { "OMNI_CI_DEFAULT_BRANCH": "trunk" } }"#,
        )
        .unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();
        assert_eq!(
            settings.env.get("OMNI_CI_DEFAULT_BRANCH").unwrap(),
            "trunk"
        );
    }

    #[test]
    fn settings_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("missing.json")).unwrap();
        assert!(settings.env.is_empty());
    }

    #[test]
    fn settings_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();
        assert!(Settings::load_from_path(&settings_path).is_err());
    }

    #[test]
    fn environment_variable_takes_precedence() {
        env::set_var("OMNI_CI_TEST_SETTINGS_ENV_ONLY", "from_env");
        assert_eq!(
            get_env_var("OMNI_CI_TEST_SETTINGS_ENV_ONLY").unwrap(),
            "from_env"
        );
        env::remove_var("OMNI_CI_TEST_SETTINGS_ENV_ONLY");
    }
}
