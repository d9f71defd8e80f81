use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest grid whose coordinates fit a cell's `i32`
pub const MAX_GRID_SIZE: usize = i32::MAX as usize;

/// How enemy cells avoid the snake's line of travel when relocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyPlacement {
    /// Reject cells sharing the head's row and cells sharing its column,
    /// whatever the direction
    #[default]
    Legacy,
    /// Reject cells sharing the head's row when moving vertically, or its
    /// column when moving horizontally
    DirectionAware,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square game grid
    pub grid_size: usize,
    /// Initial length of the snake
    pub start_length: usize,
    /// Milliseconds between two ticks
    pub tick_interval_ms: u64,
    /// Seed for food and enemy placement, random when absent
    pub seed: Option<u64>,
    /// Lane-avoidance rule used when relocating enemies
    pub enemy_placement: EnemyPlacement,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 50,
            start_length: 10,
            tick_interval_ms: 50,
            seed: None,
            enemy_placement: EnemyPlacement::Legacy,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            grid_size: 12,
            start_length: 3,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize game config")?;
        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// The grid has to hold the initial snake with a free column in front of
    /// its head, and leave enough room for enemy placement to terminate.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_length == 0 {
            return Err("start_length must be at least 1".to_string());
        }

        if self.grid_size < 4 {
            return Err(format!("grid_size must be at least 4, got {}", self.grid_size));
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(format!(
                "grid_size must be at most {}, got {}",
                MAX_GRID_SIZE, self.grid_size
            ));
        }

        if self.grid_size < self.start_length.saturating_add(3) {
            return Err(format!(
                "grid_size ({}) must exceed start_length ({}) by at least 3",
                self.grid_size, self.start_length
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }

        Ok(())
    }
}
