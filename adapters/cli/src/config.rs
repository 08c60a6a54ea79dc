//! Session configuration loaded from TOML.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use serde::Deserialize;
use soulkeeper_core::Location;
use soulkeeper_system_navigation::{DualConfig, TieBreak};
use soulkeeper_system_spawning::Config as SpawningConfig;
use soulkeeper_world::WorldConfig;
use thiserror::Error;

/// Reasons a configuration document was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the expected layout.
    #[error("failed to parse session config: {0}")]
    Parse(#[from] toml::de::Error),
    /// No spawn point was configured.
    #[error("at least one spawn point is required")]
    NoSpawnPoints,
    /// The reward range is empty.
    #[error("reward range {min}..={max} is empty")]
    EmptyRewardRange {
        /// Lowest reward.
        min: u32,
        /// Highest reward.
        max: u32,
    },
    /// The focus-change threshold lies outside `(0, 1]`.
    #[error("focus threshold {0} must lie in (0, 1]")]
    InvalidThreshold(f32),
    /// The inventory grid has no columns.
    #[error("inventory grid needs at least one column")]
    NoColumns,
}

/// Rule applied when the gameplay panel switches between its lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakSetting {
    /// First selectable entry.
    First,
    /// Entry horizontally closest to the previous selection.
    #[default]
    NearestX,
}

impl From<TieBreakSetting> for TieBreak {
    fn from(setting: TieBreakSetting) -> Self {
        match setting {
            TieBreakSetting::First => TieBreak::First,
            TieBreakSetting::NearestX => TieBreak::NearestX,
        }
    }
}

/// Tunables of a headless session.
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Screen positions of the spawn points, left to right or in any order.
    pub spawn_points: Vec<Vec2>,
    /// Milliseconds between spawn attempts.
    pub spawn_interval_ms: u64,
    /// Seed of the spawner's random generator.
    pub rng_seed: u64,
    /// Lowest reward an enemy can carry.
    pub reward_min: u32,
    /// Highest reward an enemy can carry.
    pub reward_max: u32,
    /// Milliseconds a spawn point stays blocked after its enemy dies.
    pub release_delay_ms: u64,
    /// Number of souls the inventory can hold.
    pub soul_capacity: usize,
    /// Location the session takes place in.
    pub location: Location,
    /// Locations dropped souls may be bound to; empty means all of them.
    pub soul_locations: Vec<Location>,
    /// Axis magnitude needed to switch gameplay lists.
    pub focus_threshold: f32,
    /// Selection rule applied on each gameplay list switch.
    pub tie_break: TieBreakSetting,
    /// Size of the selectable control drawn over each enemy.
    pub enemy_control_size: Vec2,
    /// Vertical position of the attack action bar.
    pub action_bar_y: f32,
    /// Cells per row of the inventory grid.
    pub inventory_columns: usize,
    /// Size of one inventory cell, spacing included.
    pub inventory_cell: Vec2,
    /// Visible area of the inventory grid.
    pub inventory_viewport: Vec2,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            spawn_points: world.spawn_points,
            spawn_interval_ms: 2_000,
            rng_seed: 0x5EED,
            reward_min: 1,
            reward_max: 30,
            release_delay_ms: world.release_delay.as_millis() as u64,
            soul_capacity: world.soul_capacity,
            location: world.location,
            soul_locations: Location::ALL.to_vec(),
            focus_threshold: DualConfig::default().threshold,
            tie_break: TieBreakSetting::default(),
            enemy_control_size: Vec2::new(96.0, 96.0),
            action_bar_y: 600.0,
            inventory_columns: 4,
            inventory_cell: Vec2::new(72.0, 72.0),
            inventory_viewport: Vec2::new(288.0, 216.0),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the configuration stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_points.is_empty() {
            return Err(ConfigError::NoSpawnPoints);
        }
        if self.reward_min > self.reward_max {
            return Err(ConfigError::EmptyRewardRange {
                min: self.reward_min,
                max: self.reward_max,
            });
        }
        if !(self.focus_threshold > 0.0 && self.focus_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.focus_threshold));
        }
        if self.inventory_columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        Ok(())
    }

    /// World tunables derived from this configuration.
    #[must_use]
    pub fn world(&self) -> WorldConfig {
        WorldConfig {
            spawn_points: self.spawn_points.clone(),
            release_delay: Duration::from_millis(self.release_delay_ms),
            soul_capacity: self.soul_capacity,
            location: self.location,
        }
    }

    /// Spawner tunables derived from this configuration.
    #[must_use]
    pub fn spawning(&self) -> SpawningConfig {
        SpawningConfig::new(
            Duration::from_millis(self.spawn_interval_ms),
            self.rng_seed,
            self.reward_min..=self.reward_max,
        )
        .with_soul_locations(self.soul_locations.clone())
    }

    /// Gameplay panel tunables derived from this configuration.
    #[must_use]
    pub fn dual(&self) -> DualConfig {
        DualConfig {
            threshold: self.focus_threshold,
            tie_break: self.tie_break.into(),
        }
    }
}
