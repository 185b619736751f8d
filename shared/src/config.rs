//! Configuration types for the evolutionary run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Slack for rounding when checking that the two quotas fit in one population
const RATE_TOLERANCE: f64 = 1e-9;

/// Genetic-algorithm parameters, fixed for the lifetime of a population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of individuals per generation
    pub population_size: usize,
    /// Fraction of the best individuals replayed unchanged (0.0 to 1.0)
    pub retention_rate: f64,
    /// Fraction of fresh random individuals per generation (0.0 to 1.0)
    pub exploration_rate: f64,
    /// Per-gene probability of replacing a child's command with a random one
    pub mutation_probability: f64,
    /// Ticks per generation, which is also the move-sequence length
    pub num_frames: usize,
    /// Flood-fill rank bound used to scale the completion reward
    pub ff_weight_threshold: f64,
    /// Flat reward for holding the key without reaching the door
    pub key_bonus: f64,
    /// Seed for every random decision the population makes
    pub seed: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            retention_rate: 0.5,
            exploration_rate: 0.3,
            mutation_probability: 0.005,
            num_frames: 200,
            ff_weight_threshold: 500.0,
            key_bonus: 1000.0,
            seed: 0,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 1".to_string(),
            ));
        }
        if self.num_frames == 0 {
            return Err(Error::InvalidConfig(
                "num_frames must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("retention_rate", self.retention_rate),
            ("exploration_rate", self.exploration_rate),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.retention_rate + self.exploration_rate > 1.0 + RATE_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "retention_rate + exploration_rate must not exceed 1, got {}",
                self.retention_rate + self.exploration_rate
            )));
        }
        Ok(())
    }

    /// Individuals carried over unchanged
    pub fn num_retained(&self) -> usize {
        ((self.population_size as f64 * self.retention_rate).floor() as usize)
            .min(self.population_size)
    }

    /// Fresh random individuals
    pub fn num_explored(&self) -> usize {
        ((self.population_size as f64 * self.exploration_rate).floor() as usize)
            .min(self.population_size - self.num_retained())
    }

    /// Slots filled by crossover children
    pub fn num_children(&self) -> usize {
        self.population_size - self.num_retained() - self.num_explored()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Engine-facing run flags. Pause, AI toggle and random-AI mode change how
/// the simulation driver advances; drawing-related flags live with the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub is_pause: bool,
    pub is_ai_enabled: bool,
    /// Replace the population with random genomes instead of running selection
    pub is_random_ai: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            is_pause: false,
            is_ai_enabled: true,
            is_random_ai: false,
        }
    }
}
