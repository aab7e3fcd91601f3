//! Configuration management for paddock.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use paddock_core::TieBreak;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "paddock";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "league.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PADDOCK_`)
/// 2. TOML config file at `~/.config/paddock/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Defaults for new championships.
    pub league: LeagueConfig,
    /// Standings configuration.
    pub standings: StandingsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/paddock/league.db`
    pub database_path: Option<PathBuf>,
}

/// Defaults applied when a championship is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Points by finishing position, winner first.
    pub default_points_per_position: Vec<u32>,
    /// Maximum number of teams. 0 for unlimited.
    pub max_teams: u32,
    /// Maximum drivers per team. 0 for unlimited.
    pub max_drivers_per_team: u32,
}

/// Standings-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsConfig {
    /// Ordering of entries with equal points.
    pub tie_break: TieBreak,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            default_points_per_position: vec![25, 18, 15, 12, 10, 8, 6, 4, 2, 1],
            max_teams: 0,
            max_drivers_per_team: 0,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// `None` reads the default config file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PADDOCK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let points = &self.league.default_points_per_position;
        if points.is_empty() {
            return Err(Error::ConfigValidation {
                message: "default_points_per_position must not be empty".to_string(),
            });
        }

        if points.windows(2).any(|w| w[0] < w[1]) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_points_per_position must not increase with position: {points:?}"
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
