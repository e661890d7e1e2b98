//! Runtime configuration.
//!
//! Every section has a `Default`, and a JSON document only needs to name the
//! fields it overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::evaluator::stockfish_api::DEFAULT_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root_dir: PathBuf,
    pub max_games: usize,
    pub max_usage_fraction: f32,
    /// Size of the backing store in bytes; 0 disables the usage quota.
    pub capacity_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("board_data"),
            max_games: 50,
            max_usage_fraction: 0.8,
            capacity_bytes: 1_572_864,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub base_url: String,
    pub depth: u8,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub verify_tls: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            depth: 5,
            timeout_ms: 60_000,
            max_retries: 3,
            retry_delay_ms: 500,
            verify_tls: true,
        }
    }
}

impl EvaluatorConfig {
    pub fn preset(difficulty: Difficulty) -> Self {
        let (depth, timeout_secs) = match difficulty {
            Difficulty::Easy => (5, 15),
            Difficulty::Medium => (8, 25),
            Difficulty::Hard => (11, 45),
            Difficulty::Expert => (15, 60),
        };
        Self {
            depth,
            timeout_ms: timeout_secs * 1000,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub storage: StorageConfig,
    pub evaluator: EvaluatorConfig,
    /// Optional preset applied over `evaluator.depth`/`timeout_ms`.
    pub difficulty: Option<Difficulty>,
    /// Snapshot the position after this many logged entries.
    pub snapshot_interval: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            evaluator: EvaluatorConfig::default(),
            difficulty: None,
            snapshot_interval: 10,
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: BoardConfig = serde_json::from_str(json)?;
        if let Some(difficulty) = config.difficulty {
            let preset = EvaluatorConfig::preset(difficulty);
            config.evaluator.depth = preset.depth;
            config.evaluator.timeout_ms = preset.timeout_ms;
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
