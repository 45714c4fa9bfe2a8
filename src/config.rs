//! Game configuration loaded from TOML.

use crate::game::{GameSetup, Position};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Board parameters for new games and where finished logs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of rows.
    #[serde(default = "default_rows")]
    rows: usize,

    /// Number of columns.
    #[serde(default = "default_cols")]
    cols: usize,

    /// Base anchors for player one and player two.
    #[serde(default = "default_bases")]
    bases: [Position; 2],

    /// Directory holding one JSON log per game.
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
}

fn default_rows() -> usize {
    14
}

fn default_cols() -> usize {
    28
}

fn default_bases() -> [Position; 2] {
    [Position::new(6, 4), Position::new(6, 22)]
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/games")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            bases: default_bases(),
            data_dir: default_data_dir(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(rows = config.rows, cols = config.cols, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a given file cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Replaces the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Setup for a new game under this configuration.
    pub fn setup(&self) -> GameSetup {
        GameSetup::new(self.rows, self.cols, self.bases)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_standard_board() {
        let config = GameConfig::default();
        assert_eq!(config.setup(), GameSetup::standard());
        assert_eq!(config.data_dir(), &PathBuf::from("data/games"));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: GameConfig = toml::from_str("rows = 10\ncols = 20\nbases = [[0, 0], [8, 18]]\n").unwrap();
        assert_eq!(*config.rows(), 10);
        assert_eq!(config.bases()[1], Position::new(8, 18));
        assert_eq!(config.data_dir(), &default_data_dir());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = GameConfig::from_file("/nonexistent/conquid.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
        assert!(err.file.ends_with("config.rs"));
    }
}
