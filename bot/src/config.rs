use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sweeper_core::GameConfig;
use sweeper_surface::Layout;
use sweeper_vision::VisionConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Pacing and stop conditions of the automated players. Times are seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Move attempts per batch.
    pub num_moves: u32,
    pub delay: f64,
    pub start_delay: f64,
    pub batch_delay: f64,
    pub restart_delay: f64,
    /// Stop after this many finished games.
    pub max_games: Option<u32>,
    pub seed: Option<u64>,
    pub exit_key: char,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            num_moves: 50,
            delay: 0.01,
            start_delay: 0.5,
            batch_delay: 0.5,
            restart_delay: 0.1,
            max_games: None,
            seed: None,
            exit_key: 's',
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

impl AgentConfig {
    pub fn delay(&self) -> Duration {
        seconds(self.delay)
    }

    pub fn start_delay(&self) -> Duration {
        seconds(self.start_delay)
    }

    pub fn batch_delay(&self) -> Duration {
        seconds(self.batch_delay)
    }

    pub fn restart_delay(&self) -> Duration {
        seconds(self.restart_delay)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub directory: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("debug_screenshots"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub game: GameConfig,
    pub layout: Layout,
    pub agent: AgentConfig,
    pub vision: VisionConfig,
    pub debug: DebugConfig,
}

impl BotConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = BotConfig::from_toml_str("").unwrap();
        assert_eq!(config, BotConfig::default());
        assert_eq!(config.agent.num_moves, 50);
        assert_eq!(config.agent.exit_key, 's');
        assert_eq!(config.game, GameConfig::default());
    }

    #[test]
    fn sections_override_fields() {
        let config = BotConfig::from_toml_str(
            r#"
            [game]
            size = [5, 6]
            mines = 4

            [agent]
            num_moves = 10
            max_games = 3
            delay = 0.0

            [debug]
            enabled = false

            [vision.classify]
            light_threshold = 190.0
            "#,
        )
        .unwrap();

        assert_eq!(config.game, GameConfig::new((5, 6), 4).unwrap());
        assert_eq!(config.agent.num_moves, 10);
        assert_eq!(config.agent.max_games, Some(3));
        assert_eq!(config.agent.delay(), Duration::ZERO);
        assert_eq!(config.agent.batch_delay(), Duration::from_millis(500));
        assert!(!config.debug.enabled);
        assert_eq!(config.debug.directory, PathBuf::from("debug_screenshots"));
        assert_eq!(config.vision.classify.light_threshold, 190.0);
        assert_eq!(config.layout.cell_size, 40);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let err = BotConfig::from_toml_str("[agent]\nnum_moves = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BotConfig::from_path(Path::new("/nonexistent/sweeper.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn negative_delays_clamp_to_zero() {
        let agent = AgentConfig {
            delay: -1.0,
            ..AgentConfig::default()
        };
        assert_eq!(agent.delay(), Duration::ZERO);
    }
}
