pub mod flow_field;
pub mod game;
pub mod hazard;
pub mod population;
pub mod simulation;

pub use flow_field::{FlowField, FlowFields};
pub use game::{Game, GameStatus, GameView};
pub use hazard::{Hazard, HazardView, Hazards, Motion};
pub use population::{GenerationSummary, Population};
pub use simulation::{Simulation, SimulationStats};

use shared::{Genome, Grid, PopulationConfig, Result};
use std::sync::Arc;

/// Evolve a population on `grid` for a number of generations.
///
/// Returns the per-generation summaries and the genome of the best
/// individual of the final scored generation.
pub fn run_simulation(
    grid: Arc<Grid>,
    config: PopulationConfig,
    generations: usize,
) -> Result<(Vec<GenerationSummary>, Option<Genome>)> {
    let mut population = Population::new(grid, config)?;
    let num_frames = population.config().num_frames;
    let mut summaries = Vec::with_capacity(generations);
    let mut best = None;

    for _ in 0..generations {
        for tick in 0..num_frames {
            population.update(tick, None, true);
        }
        population.calc_fitness();
        best = population.best().map(|game| game.genome().clone());
        summaries.push(population.selection());
    }

    Ok((summaries, best))
}
