//! Configuration loading for chess-term.

use anyhow::{Context, Result};
use chess_controller::ControllerConfig;
use chess_core::Color;
use chess_engine::{AiLevel, StandardEngine};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const SEARCH_PATHS: [&str; 3] = ["chess.toml", "../chess.toml", "../../chess.toml"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Delay before the automated reply, in milliseconds.
    pub reply_delay_ms: u64,
    pub human: Color,
    pub ai: AiLevel,
    /// Position to start every game from instead of the standard one.
    pub start_fen: Option<String>,
    /// Fixed seed for the automated side; taken from the clock when unset.
    pub seed: Option<u64>,
    /// Draw the board with ANSI colors.
    pub ansi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reply_delay_ms: 3000,
            human: Color::White,
            ai: AiLevel::default(),
            start_fen: None,
            seed: None,
            ansi: false,
        }
    }
}

impl Config {
    /// Loads `path`, or the first `chess.toml` found in the current or parent
    /// directories, or the defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path).await;
        }
        for path in SEARCH_PATHS {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::read(&path).await;
            }
        }
        debug!("no chess.toml found, using defaults");
        Ok(Config::default())
    }

    async fn read(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::parse(&content).with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            human: self.human,
        }
    }

    /// Builds the engine for game number `game` of the session.
    ///
    /// Each game gets its own seed so consecutive games differ even when the
    /// configured seed is fixed.
    pub fn engine(&self, game: u64) -> Result<StandardEngine> {
        let engine = match &self.start_fen {
            Some(fen) => StandardEngine::from_fen(fen)
                .with_context(|| format!("invalid start_fen '{}'", fen))?,
            None => StandardEngine::new(),
        };
        let seed = self.seed.unwrap_or_else(clock_seed).wrapping_add(game);
        Ok(engine.with_level(self.ai).with_seed(seed))
    }
}

fn clock_seed() -> u64 {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::MoveEngine;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(
            Config::default().controller_config(),
            ControllerConfig::default()
        );
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            reply_delay_ms = 500
            human = "black"
            ai = "minimax:3"
            start_fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1"
            seed = 42
            ansi = true
            "#,
        )
        .unwrap();
        assert_eq!(config.reply_delay_ms, 500);
        assert_eq!(config.human, Color::Black);
        assert_eq!(config.ai, AiLevel::Minimax(3));
        assert_eq!(config.seed, Some(42));
        assert!(config.ansi);
        assert_eq!(
            config.controller_config().reply_delay,
            Duration::from_millis(500)
        );

        let engine = config.engine(0).unwrap();
        assert_eq!(engine.level(), AiLevel::Minimax(3));
        assert_eq!(engine.current_snapshot().pieces().len(), 3);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(Config::parse("port = 9999").is_err());
        assert!(Config::parse("ai = \"genius\"").is_err());
        assert!(Config::parse("human = \"green\"").is_err());
    }

    #[test]
    fn bad_start_fen_fails_engine_creation() {
        let config = Config {
            start_fen: Some("nonsense".into()),
            ..Config::default()
        };
        assert!(config.engine(0).is_err());
    }

    #[tokio::test]
    async fn explicit_missing_path_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here/chess.toml")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
