use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{GeoPosition, TemperatureUnit};

fn default_language() -> String {
    "en".to_string()
}

fn default_forecast_hours() -> usize {
    1
}

/// User preferences, stored as TOML on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// BCP 47-ish language code handed to the localization layer.
    #[serde(default = "default_language")]
    pub language: String,

    /// 1 renders current conditions only; larger values add an hourly
    /// outlook with apparent temperatures.
    #[serde(default = "default_forecast_hours")]
    pub forecast_hours: usize,

    /// Manually configured position; when absent the caller must supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPosition>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::default(),
            language: default_language(),
            forecast_hours: default_forecast_hours(),
            position: None,
        }
    }
}

impl Settings {
    /// Load settings from the platform config path, or return defaults on
    /// first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to the platform config path, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the settings file.
    pub fn settings_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "newtab", "newtab")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_celsius_english_one_hour() {
        let settings = Settings::default();

        assert_eq!(settings.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(settings.language, "en");
        assert!(settings.position.is_none());
        assert_eq!(settings.forecast_hours, 1);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(settings.language, "en");
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let settings = Settings {
            temperature_unit: TemperatureUnit::Fahrenheit,
            language: "nb".to_string(),
            forecast_hours: 6,
            position: Some(GeoPosition::new(59.91, 10.75)),
        };
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(&path).unwrap();
        assert_eq!(reloaded.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(reloaded.language, "nb");
        assert_eq!(reloaded.position, Some(GeoPosition::new(59.91, 10.75)));
        assert_eq!(reloaded.forecast_hours, 6);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "temperature_unit = \"fahrenheit\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(settings.language, "en");
        assert_eq!(settings.forecast_hours, 1);
    }
}
