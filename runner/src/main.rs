mod report;

use anyhow::{Context, Result};
use report::RunReport;
use shared::{Grid, PopulationConfig};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_GENERATIONS: usize = 20;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maze_runner=info,sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let level_path = env::var("LEVEL_PATH").context("LEVEL_PATH must point to a level file")?;
    let generations = match env::var("GENERATIONS") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("GENERATIONS is not a number: {}", value))?,
        Err(_) => DEFAULT_GENERATIONS,
    };
    let config = match env::var("CONFIG_PATH") {
        Ok(path) => load_config(&path)?,
        Err(_) => PopulationConfig::default(),
    };

    tracing::info!("Starting maze runner");
    tracing::info!("Level: {}", level_path);

    let grid = Arc::new(load_grid(&level_path)?);
    let (width, height) = grid.size();
    tracing::info!(
        "Loaded {}x{} level with {} hazards",
        width,
        height,
        grid.hazards().count()
    );

    let (summaries, best_genome) = sim::run_simulation(grid, config.clone(), generations)
        .context("Failed to start the population")?;

    let report = RunReport::new(&level_path, config, summaries, best_genome);
    tracing::info!(
        "Run {} finished: best fitness {:.2}, first completion {:?}",
        report.run_id,
        report.best_fitness(),
        report.first_completion()
    );

    let json = serde_json::to_string_pretty(&report).context("Failed to encode run report")?;
    match env::var("REPORT_PATH") {
        Ok(path) => std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path))?,
        Err(_) => println!("{}", json),
    }

    Ok(())
}

/// Load a level, choosing the ASCII format for `.txt` files and JSON otherwise
fn load_grid(path: &str) -> Result<Grid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read level file {}", path))?;
    let is_ascii = Path::new(path)
        .extension()
        .map(|ext| ext == "txt")
        .unwrap_or(false);

    let grid = if is_ascii {
        Grid::from_ascii(&text)
    } else {
        Grid::from_json(&text)
    };
    grid.with_context(|| format!("Failed to load level {}", path))
}

fn load_config(path: &str) -> Result<PopulationConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    PopulationConfig::from_json(&text).with_context(|| format!("Invalid config in {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(name: &str) -> String {
        format!("{}/../levels/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn test_load_ascii_level() {
        let grid = load_grid(&level("lvl1.txt")).unwrap();
        assert_eq!(grid.size(), (15, 11));
        assert_eq!(grid.hazards().count(), 4);
    }

    #[test]
    fn test_load_json_level() {
        let grid = load_grid(&level("loop.json")).unwrap();
        assert_eq!(grid.size(), (9, 5));
        assert_eq!(grid.patrollers().len(), 1);
        assert_eq!(grid.spikes().len(), 1);
    }

    #[test]
    fn test_missing_level_file() {
        let err = load_grid(&level("does-not-exist.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read level file"));
    }

    #[test]
    fn test_sample_levels_are_solvable() {
        for name in ["lvl1.txt", "loop.json"] {
            let grid = load_grid(&level(name)).unwrap();
            let fields = sim::FlowFields::solve(&grid);
            assert!(fields.key.rank(grid.agent_start()).is_some(), "{}", name);
            assert!(fields.door.rank(grid.key()).is_some(), "{}", name);
        }
    }
}
