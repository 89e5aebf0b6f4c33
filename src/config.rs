//! Simulation Configuration
//!
//! Tunables that are not fixed by the game rules. Every field has a default;
//! a JSON file only needs to name what it overrides.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::game::tilemap::LEVEL_COUNT;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for `SimConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Timed enemy spawning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between spawns
    pub interval: f32,
    /// No spawns while this many enemies are alive
    pub max_enemies: usize,
    /// Distance from the player at which enemies appear
    pub spawn_distance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 3.0,
            max_enemies: 5,
            spawn_distance: 200.0,
        }
    }
}

/// Level progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Enemies to defeat before the boss appears
    pub enemies_per_level: u32,
    /// Load the next level as soon as the boss falls
    pub auto_advance: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            enemies_per_level: 8,
            auto_advance: true,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Level RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// First level (1-based)
    pub start_level: u32,
    /// Optional upper bound for a single tick's delta (s). Unset means
    /// timers decay by the full frame interval.
    pub max_tick_delta: Option<f32>,
    /// Resolve enemies and bosses against solid tiles
    pub enemy_tile_collision: bool,
    /// Enemy spawning
    pub spawner: SpawnConfig,
    /// Level progression
    pub progression: ProgressionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_level: 1,
            max_tick_delta: None,
            enemy_tile_collision: true,
            spawner: SpawnConfig::default(),
            progression: ProgressionConfig::default(),
        }
    }
}

impl SimConfig {
    /// Default configuration with a fixed level seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=LEVEL_COUNT).contains(&self.start_level) {
            return Err(ConfigError::Invalid(format!(
                "start_level must be 1..={LEVEL_COUNT}, got {}",
                self.start_level
            )));
        }
        if let Some(cap) = self.max_tick_delta {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "max_tick_delta must be positive, got {cap}"
                )));
            }
        }
        if !self.spawner.interval.is_finite() || self.spawner.interval <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawner.interval must be positive, got {}",
                self.spawner.interval
            )));
        }
        if !self.spawner.spawn_distance.is_finite() || self.spawner.spawn_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawner.spawn_distance must be non-negative, got {}",
                self.spawner.spawn_distance
            )));
        }
        Ok(())
    }
}
