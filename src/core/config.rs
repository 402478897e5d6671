//! Simulation configuration with documented constants
//!
//! One immutable `SimulationConfig` is built before the simulation starts and
//! handed by reference to every component that reads a tunable value. Files are
//! strict: every key must be present, unknown keys are rejected, and the result
//! must pass `validate()`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::Bounds;

/// Configuration for the whole simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub colonies: ColonyConfig,
    pub bees: BeeConfig,
    pub wasps: WaspConfig,
    pub flowers: FlowerConfig,
    pub vision: VisionConfig,
    pub claims: ClaimConfig,
    pub economy: EconomyConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColonyConfig {
    /// Initial roster size of each colony; its length is the colony count
    pub bees_per_colony: Vec<usize>,
    /// Minimum Euclidean distance between two hives at reset
    pub min_hive_spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeeConfig {
    pub attack_power: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaspConfig {
    pub count: usize,
    pub health: u32,
    /// Food removed from a hive's stock per attack
    pub attack_power: u32,
    /// Minimum Euclidean distance between a wasp spawn and every hive
    pub min_hive_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowerConfig {
    /// Probability that an eligible cell holds a flower
    pub density: f64,
    /// Number of flower clusters; 0 spreads flowers uniformly
    pub clusters: usize,
    /// Maximum Euclidean distance from a cluster center for a flower cell
    pub cluster_spread: f64,
    /// Idle ticks before a picked flower regrows its pollen
    pub regrow_ticks: u32,
}

/// Vision window sizes
///
/// The half-width of an agent's window is `base_radius * multiplier`,
/// rounded down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisionConfig {
    pub base_radius: u32,
    pub queen_multiplier: f32,
    pub bee_multiplier: f32,
    pub wasp_multiplier: f32,
}

impl VisionConfig {
    pub fn half_width(&self, multiplier: f32) -> i32 {
        (self.base_radius as f32 * multiplier).floor() as i32
    }
}

/// How claims written in the same decision phase are reconciled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCommit {
    /// Later writers overwrite earlier ones; the pollen flag arbitrates
    #[default]
    LastWriterWins,
    /// First committed intent per flower wins; later intents are rejected
    IntentThenCommit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimConfig {
    /// Side of the square sections of the claim map, in cells
    pub section_size: u32,
    pub commit: ClaimCommit,
}

/// Colony economy constants
///
/// `health = floor(food_stock / alive_bees)`. Above `good_health` the trend
/// counter climbs, below `bad_health` it falls; at `+trend_threshold` the
/// queen lays a bee, at `-trend_threshold` she culls one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EconomyConfig {
    pub nutrition_per_pollen: f64,
    pub consumption_per_bee: f64,
    pub starting_food_per_bee: f64,
    pub good_health: i64,
    pub bad_health: i64,
    pub trend_threshold: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub max_steps: u64,
    pub seed: u64,
    /// Minimum agent count before observations are computed in parallel
    pub parallel_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                width: 75,
                height: 75,
            },
            colonies: ColonyConfig {
                bees_per_colony: vec![45, 20],
                min_hive_spacing: 10.0,
            },
            bees: BeeConfig { attack_power: 1 },
            wasps: WaspConfig {
                count: 2,
                health: 3,
                attack_power: 1,
                min_hive_distance: 20.0,
            },
            flowers: FlowerConfig {
                density: 0.1,
                clusters: 2,
                cluster_spread: 25.0,
                regrow_ticks: 5,
            },
            vision: VisionConfig {
                base_radius: 3,
                queen_multiplier: 1.0,
                bee_multiplier: 1.0,
                wasp_multiplier: 2.0,
            },
            claims: ClaimConfig {
                section_size: 8,
                commit: ClaimCommit::LastWriterWins,
            },
            economy: EconomyConfig {
                nutrition_per_pollen: 5.0,
                consumption_per_bee: 0.1,
                starting_food_per_bee: 10.0,
                good_health: 12,
                bad_health: 5,
                trend_threshold: 10,
            },
            run: RunConfig {
                max_steps: 1000,
                seed: 42,
                parallel_threshold: 1000,
            },
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.grid.width, self.grid.height)
    }

    pub fn colony_count(&self) -> usize {
        self.colonies.bees_per_colony.len()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(SimError::Config(format!(
                "grid must be non-empty, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }

        if self.colonies.bees_per_colony.is_empty() {
            return Err(SimError::Config("at least one colony is required".into()));
        }
        if let Some(idx) = self.colonies.bees_per_colony.iter().position(|&n| n == 0) {
            return Err(SimError::Config(format!("colony {} starts with no bees", idx)));
        }

        if !(0.0..=1.0).contains(&self.flowers.density) {
            return Err(SimError::Config(format!(
                "flowers.density ({}) must be within [0, 1]",
                self.flowers.density
            )));
        }

        if self.economy.good_health < self.economy.bad_health {
            return Err(SimError::Config(format!(
                "economy.good_health ({}) should be >= economy.bad_health ({})",
                self.economy.good_health, self.economy.bad_health
            )));
        }

        if self.economy.trend_threshold < 1 {
            return Err(SimError::Config("economy.trend_threshold must be at least 1".into()));
        }

        if self.economy.consumption_per_bee < 0.0 || self.economy.nutrition_per_pollen < 0.0 {
            return Err(SimError::Config("economy rates must not be negative".into()));
        }

        if self.claims.section_size == 0 {
            return Err(SimError::Config("claims.section_size must be at least 1".into()));
        }

        let multipliers = [
            self.vision.queen_multiplier,
            self.vision.bee_multiplier,
            self.vision.wasp_multiplier,
        ];
        if multipliers.iter().any(|m| *m < 0.0 || !m.is_finite()) {
            return Err(SimError::Config("vision multipliers must be finite and >= 0".into()));
        }

        Ok(())
    }
}
