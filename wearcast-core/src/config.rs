use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{TemperatureBias, UserPreferences};
use crate::provider::Location;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [preferences]
/// bias = "runs-cold"
/// formal = false
/// bike_walk = true
///
/// [location]
/// name = "Berlin"
/// latitude = 52.52
/// longitude = 13.405
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Override for the forecast endpoint, e.g. a self-hosted Open-Meteo.
    pub api_base: Option<String>,

    /// Override for the place search service (Nominatim-compatible).
    pub geocoder_base: Option<String>,

    #[serde(default)]
    pub preferences: UserPreferences,

    /// Location used by `show` when no place or coordinates are given.
    /// Updated after every successful forecast run.
    pub location: Option<Location>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wearcast", "wearcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Turning runs-cold on clears runs-hot; turning it off leaves a runs-hot setting alone.
    pub fn set_runs_cold(&mut self, on: bool) {
        let bias = &mut self.preferences.bias;
        if on {
            *bias = TemperatureBias::RunsCold;
        } else if *bias == TemperatureBias::RunsCold {
            *bias = TemperatureBias::Neutral;
        }
    }

    /// Mirror of [`Config::set_runs_cold`].
    pub fn set_runs_hot(&mut self, on: bool) {
        let bias = &mut self.preferences.bias;
        if on {
            *bias = TemperatureBias::RunsHot;
        } else if *bias == TemperatureBias::RunsHot {
            *bias = TemperatureBias::Neutral;
        }
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// The saved location, with a hint when none is configured.
    pub fn saved_location(&self) -> Result<&Location> {
        self.location.as_ref().ok_or_else(|| {
            anyhow!(
                "No location configured.\n\
                 Hint: run `wearcast show <place>`, pass --lat/--lon, or run `wearcast configure`."
            )
        })
    }
}
