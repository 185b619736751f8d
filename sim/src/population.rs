use crate::flow_field::FlowFields;
use crate::game::{Game, GameView};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared::{Command, Grid, PopulationConfig, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Outcome of one generation, reported when selection runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub completed: usize,
    pub dead: usize,
    pub keys_collected: usize,
    pub retained: usize,
    pub explored: usize,
    pub children: usize,
}

pub struct Population {
    grid: Arc<Grid>,
    config: PopulationConfig,
    games: Vec<Game>,
    fields: FlowFields,
    rng: ChaCha8Rng,
    generation: u32,
}

impl Population {
    /// Create a population of random individuals for the given level
    pub fn new(grid: Arc<Grid>, config: PopulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let games = (0..config.population_size)
            .map(|_| Game::random(&grid, config.num_frames, &mut rng))
            .collect();
        let fields = FlowFields::solve(&grid);

        info!(
            population_size = config.population_size,
            num_frames = config.num_frames,
            seed = config.seed,
            "population created"
        );

        Ok(Self {
            grid,
            config,
            games,
            fields,
            rng,
            generation: 1,
        })
    }

    /// Step every individual once.
    ///
    /// `manual` overrides individual 0's command for this tick. With AI
    /// disabled only the manually driven individual advances.
    pub fn update(&mut self, tick: usize, manual: Option<Command>, is_ai_enabled: bool) {
        let grid = &*self.grid;

        if !is_ai_enabled {
            if let (Some(command), Some(first)) = (manual, self.games.first_mut()) {
                first.step(grid, tick, Some(command));
            }
            return;
        }

        self.games
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, game)| {
                let command = if i == 0 { manual } else { None };
                game.step(grid, tick, command);
            });
    }

    /// Score every individual and return selection weights on a 0-100 scale.
    /// All weights stay zero when nobody scores above zero.
    pub fn calc_fitness(&mut self) -> Vec<f64> {
        let scores = self
            .games
            .iter_mut()
            .map(|game| game.fitness_score(&self.fields, &self.config))
            .collect();
        normalize_weights(scores)
    }

    /// End the generation: replay the best genomes, add random explorers and
    /// breed the rest by fitness-proportionate crossover with mutation.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn selection(&mut self) -> GenerationSummary {
        let weights = self.calc_fitness();

        let num_retained = self.config.num_retained();
        let num_explored = self.config.num_explored();
        let num_children = self.config.num_children();
        let summary = self.summarize(num_retained, num_explored, num_children);

        let mut order: Vec<usize> = (0..self.games.len()).collect();
        order.sort_by(|&a, &b| self.games[b].fitness().total_cmp(&self.games[a].fitness()));

        let grid = &*self.grid;
        let mut next = Vec::with_capacity(self.config.population_size);

        next.extend(
            order
                .iter()
                .take(num_retained)
                .map(|&i| self.games[i].replay(grid)),
        );

        for _ in 0..num_explored {
            next.push(Game::random(grid, self.config.num_frames, &mut self.rng));
        }

        let sampler = WeightedIndex::new(&weights).ok();
        for _ in 0..num_children {
            let first = pick_parent(sampler.as_ref(), self.games.len(), &mut self.rng);
            let second = pick_parent(sampler.as_ref(), self.games.len(), &mut self.rng);
            let mut genome = self.games[first]
                .genome()
                .crossover(self.games[second].genome(), &mut self.rng);
            genome.mutate(self.config.mutation_probability, &mut self.rng);
            next.push(Game::new(grid, genome));
        }

        debug!(
            retained = num_retained,
            explored = num_explored,
            children = num_children,
            uniform_sampling = sampler.is_none(),
            "selection done"
        );

        self.games = next;
        self.fields = FlowFields::solve(grid);
        self.generation += 1;

        info!(
            best = summary.best_fitness,
            mean = summary.mean_fitness,
            completed = summary.completed,
            dead = summary.dead,
            "generation finished"
        );

        summary
    }

    /// Score the current generation, then replace everyone with random genomes
    pub fn randomize(&mut self) -> GenerationSummary {
        self.calc_fitness();
        let size = self.config.population_size;
        let summary = self.summarize(0, size, 0);

        let grid = &*self.grid;
        self.games = (0..size)
            .map(|_| Game::random(grid, self.config.num_frames, &mut self.rng))
            .collect();
        self.fields = FlowFields::solve(grid);
        self.generation += 1;

        info!(best = summary.best_fitness, "population randomized");
        summary
    }

    fn summarize(&self, retained: usize, explored: usize, children: usize) -> GenerationSummary {
        let total: f64 = self.games.iter().map(Game::fitness).sum();
        GenerationSummary {
            generation: self.generation,
            best_fitness: self
                .games
                .iter()
                .map(Game::fitness)
                .fold(0.0, f64::max),
            mean_fitness: total / self.games.len().max(1) as f64,
            completed: self.games.iter().filter(|g| g.is_complete()).count(),
            dead: self.games.iter().filter(|g| g.is_dead()).count(),
            keys_collected: self.games.iter().filter(|g| g.is_key_collected()).count(),
            retained,
            explored,
            children,
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn views(&self) -> Vec<GameView> {
        self.games.iter().map(Game::view).collect()
    }

    /// Highest-scoring individual from the last fitness evaluation; the
    /// earliest one wins ties, matching the retention order
    pub fn best(&self) -> Option<&Game> {
        self.games
            .iter()
            .reduce(|best, game| if game.fitness() > best.fitness() { game } else { best })
    }

    pub fn fields(&self) -> &FlowFields {
        &self.fields
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Rescale fitness so the best is 100. Left as is when the best is not positive.
fn normalize_weights(mut scores: Vec<f64>) -> Vec<f64> {
    let max_fitness = scores.iter().copied().fold(0.0f64, f64::max);
    if max_fitness > 0.0 {
        for score in &mut scores {
            *score = *score / max_fitness * 100.0;
        }
    }
    scores
}

/// Weighted draw, or uniform when every weight is zero
fn pick_parent<R: Rng>(sampler: Option<&WeightedIndex<f64>>, len: usize, rng: &mut R) -> usize {
    match sampler {
        Some(sampler) => sampler.sample(rng),
        None => rng.gen_range(0..len),
    }
}
