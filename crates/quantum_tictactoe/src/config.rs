//! Engine configuration.

use super::Player;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for a game engine.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the collapse random source; `None` seeds from entropy.
    #[serde(default)]
    seed: Option<u64>,

    /// Player making the first move.
    #[serde(default = "default_first_player")]
    first_player: Player,
}

#[instrument]
fn default_first_player() -> Player {
    Player::X
}

impl EngineConfig {
    /// Creates a configuration.
    #[instrument]
    pub fn new(seed: Option<u64>, first_player: Player) -> Self {
        Self { seed, first_player }
    }

    /// Returns a copy with the seed replaced.
    #[instrument(skip(self))]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(seed = ?config.seed, first_player = %config.first_player, "Config loaded successfully");
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            first_player: default_first_player(),
        }
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
    #[instrument(skip(message))]
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
    fn test_defaults_from_empty_toml() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(*config.first_player(), Player::X);
        assert_eq!(*config.seed(), None);
    }

    #[test]
    fn test_parse_seed_and_first_player() {
        let config = EngineConfig::from_toml_str("seed = 17\nfirst_player = \"O\"\n").unwrap();
        assert_eq!(*config.seed(), Some(17));
        assert_eq!(*config.first_player(), Player::O);
    }

    #[test]
    fn test_invalid_toml_reports_location() {
        let err = EngineConfig::from_toml_str("first_player = \"Z\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/qttt.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }
}
