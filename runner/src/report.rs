use serde::{Deserialize, Serialize};
use shared::{Genome, PopulationConfig};
use sim::GenerationSummary;
use uuid::Uuid;

/// Everything a headless run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique ID for this run
    pub run_id: Uuid,

    /// Level file the run evolved against
    pub level: String,

    /// Parameters the population was built with
    pub config: PopulationConfig,

    /// One entry per finished generation
    pub generations: Vec<GenerationSummary>,

    /// Genome of the best individual in the last scored generation
    pub best_genome: Option<Genome>,
}

impl RunReport {
    pub fn new(
        level: &str,
        config: PopulationConfig,
        generations: Vec<GenerationSummary>,
        best_genome: Option<Genome>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            level: level.to_string(),
            config,
            generations,
            best_genome,
        }
    }

    /// Best fitness reached over the whole run
    pub fn best_fitness(&self) -> f64 {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .fold(0.0, f64::max)
    }

    /// First generation in which some individual reached the door
    pub fn first_completion(&self) -> Option<u32> {
        self.generations
            .iter()
            .find(|g| g.completed > 0)
            .map(|g| g.generation)
    }
}
