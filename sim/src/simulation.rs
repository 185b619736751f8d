//! Frame-driven wrapper around the population: tick and generation counters
//! plus the run flags a UI toggles.

use crate::game::GameView;
use crate::population::{GenerationSummary, Population};
use serde::{Deserialize, Serialize};
use shared::{Command, Grid, PopulationConfig, Result, SimulationSettings};
use std::sync::Arc;
use tracing::{debug, info};

/// Counters exposed after every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub frame_count: usize,
    pub generation_count: u32,
}

pub struct Simulation {
    grid: Arc<Grid>,
    config: PopulationConfig,
    population: Population,
    frame_count: usize,
    generation_count: u32,
    last_summary: Option<GenerationSummary>,
}

impl Simulation {
    pub fn new(grid: Arc<Grid>, config: PopulationConfig) -> Result<Self> {
        let population = Population::new(grid.clone(), config.clone())?;
        Ok(Self {
            grid,
            config,
            population,
            frame_count: 0,
            generation_count: 1,
            last_summary: None,
        })
    }

    /// Advance one frame. Returns `None` while paused.
    pub fn update(
        &mut self,
        settings: &SimulationSettings,
        manual: Option<Command>,
    ) -> Option<SimulationStats> {
        if settings.is_pause {
            return None;
        }
        self.advance(settings, manual);
        Some(self.stats())
    }

    /// Run `frames` updates back to back, as frame-skip mode does
    pub fn update_many(
        &mut self,
        settings: &SimulationSettings,
        frames: usize,
    ) -> Option<SimulationStats> {
        let mut stats = None;
        for _ in 0..frames {
            stats = self.update(settings, None).or(stats);
        }
        stats
    }

    /// Run whole generations headless and return their summaries.
    ///
    /// Nothing runs when `settings` is paused or has AI disabled, because no
    /// generation can end.
    pub fn run_generations(
        &mut self,
        settings: &SimulationSettings,
        generations: usize,
    ) -> Vec<GenerationSummary> {
        if settings.is_pause || !settings.is_ai_enabled {
            debug!(
                is_pause = settings.is_pause,
                is_ai_enabled = settings.is_ai_enabled,
                "generations cannot finish with these settings"
            );
            return Vec::new();
        }

        let mut summaries = Vec::with_capacity(generations);
        while summaries.len() < generations {
            if let Some(summary) = self.advance(settings, None) {
                summaries.push(summary);
            }
        }
        summaries
    }

    /// One unpaused frame; yields the summary when it ends a generation
    fn advance(
        &mut self,
        settings: &SimulationSettings,
        manual: Option<Command>,
    ) -> Option<GenerationSummary> {
        self.population
            .update(self.frame_count, manual, settings.is_ai_enabled);
        self.frame_count += 1;

        if self.frame_count >= self.config.num_frames && settings.is_ai_enabled {
            Some(self.start_new_generation(!settings.is_random_ai))
        } else {
            None
        }
    }

    fn start_new_generation(&mut self, is_selection: bool) -> GenerationSummary {
        let summary = if is_selection {
            self.population.selection()
        } else {
            self.population.randomize()
        };
        self.last_summary = Some(summary.clone());
        self.frame_count = 0;
        self.generation_count += 1;
        summary
    }

    /// Throw the population away and start over from generation 1
    pub fn restart(&mut self) -> Result<()> {
        self.population = Population::new(self.grid.clone(), self.config.clone())?;
        self.frame_count = 0;
        self.generation_count = 1;
        self.last_summary = None;
        info!("simulation restarted");
        Ok(())
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            frame_count: self.frame_count,
            generation_count: self.generation_count,
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn views(&self) -> Vec<GameView> {
        self.population.views()
    }

    /// Summary of the most recently finished generation
    pub fn last_summary(&self) -> Option<&GenerationSummary> {
        self.last_summary.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(num_frames: usize) -> Simulation {
        let grid = Arc::new(Grid::from_ascii("A...K\n.##..\n....D").unwrap());
        let config = PopulationConfig {
            num_frames,
            population_size: 6,
            ..Default::default()
        };
        Simulation::new(grid, config).unwrap()
    }

    #[test]
    fn test_counters_start_at_frame_zero_generation_one() {
        let sim = simulation(5);
        assert_eq!(
            sim.stats(),
            SimulationStats {
                frame_count: 0,
                generation_count: 1
            }
        );
    }

    #[test]
    fn test_paused_update_does_nothing() {
        let mut sim = simulation(5);
        let settings = SimulationSettings {
            is_pause: true,
            ..Default::default()
        };
        assert_eq!(sim.update(&settings, None), None);
        assert_eq!(sim.stats().frame_count, 0);
    }

    #[test]
    fn test_generation_rolls_over() {
        let mut sim = simulation(5);
        let settings = SimulationSettings::default();
        for _ in 0..4 {
            sim.update(&settings, None);
        }
        assert_eq!(sim.stats().frame_count, 4);

        let stats = sim.update(&settings, None).unwrap();
        assert_eq!(stats.frame_count, 0);
        assert_eq!(stats.generation_count, 2);
        assert_eq!(sim.last_summary().map(|s| s.generation), Some(1));
        assert_eq!(sim.population().generation(), 2);
    }

    #[test]
    fn test_ai_disabled_never_selects() {
        let mut sim = simulation(3);
        let settings = SimulationSettings {
            is_ai_enabled: false,
            ..Default::default()
        };
        for _ in 0..10 {
            sim.update(&settings, Some(Command::Right));
        }
        assert_eq!(sim.stats().generation_count, 1);
        assert_eq!(sim.stats().frame_count, 10);
        assert!(sim.last_summary().is_none());
    }

    #[test]
    fn test_random_ai_mode_randomizes() {
        let mut sim = simulation(2);
        let settings = SimulationSettings {
            is_random_ai: true,
            ..Default::default()
        };
        sim.update_many(&settings, 2);
        let summary = sim.last_summary().unwrap();
        assert_eq!(summary.explored, 6);
        assert_eq!(summary.retained, 0);
    }

    #[test]
    fn test_run_generations_and_restart() {
        let mut sim = simulation(8);
        let summaries = sim.run_generations(&SimulationSettings::default(), 3);
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[2].generation, 3);
        assert_eq!(sim.stats().generation_count, 4);
        assert_eq!(sim.last_summary(), summaries.last());

        sim.restart().unwrap();
        assert_eq!(sim.stats().generation_count, 1);
        assert!(sim.last_summary().is_none());
        assert_eq!(sim.views().len(), 6);
    }

    #[test]
    fn test_run_generations_needs_ai_and_no_pause() {
        let mut sim = simulation(4);
        let disabled = SimulationSettings {
            is_ai_enabled: false,
            ..Default::default()
        };
        let paused = SimulationSettings {
            is_pause: true,
            ..Default::default()
        };
        assert!(sim.run_generations(&disabled, 2).is_empty());
        assert!(sim.run_generations(&paused, 2).is_empty());
        assert_eq!(sim.stats().frame_count, 0);
        assert_eq!(sim.stats().generation_count, 1);
    }

    #[test]
    fn test_only_latest_summary_is_kept() {
        let mut sim = simulation(3);
        let settings = SimulationSettings::default();
        let summaries = sim.run_generations(&settings, 4);
        assert_eq!(summaries.len(), 4);
        assert_eq!(sim.last_summary().map(|s| s.generation), Some(4));

        sim.run_generations(&settings, 1);
        assert_eq!(sim.last_summary().map(|s| s.generation), Some(5));
    }
}
