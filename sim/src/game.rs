use crate::flow_field::FlowFields;
use crate::hazard::{HazardView, Hazards};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{Command, Genome, Grid, PopulationConfig, Position};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Alive,
    Complete,
    Dead,
}

/// Read-only snapshot of one individual for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub agent: Position,
    pub is_key_collected: bool,
    pub is_complete: bool,
    pub is_dead: bool,
    pub hazards: Vec<HazardView>,
}

/// One individual: a genome replayed against its own copy of the maze
#[derive(Debug, Clone)]
pub struct Game {
    genome: Genome,
    agent: Position,
    hazards: Hazards,
    is_key_collected: bool,
    is_complete: bool,
    is_dead: bool,
    num_key_steps: usize,
    num_door_steps: usize,
    fitness: f64,
}

impl Game {
    /// Create a game at the level's starting state with the given genome
    pub fn new(grid: &Grid, genome: Genome) -> Self {
        Self {
            genome,
            agent: grid.agent_start(),
            hazards: Hazards::new(grid),
            is_key_collected: false,
            is_complete: false,
            is_dead: false,
            num_key_steps: 0,
            num_door_steps: 0,
            fitness: 0.0,
        }
    }

    /// Create a game with `len` random moves
    pub fn random<R: Rng + ?Sized>(grid: &Grid, len: usize, rng: &mut R) -> Self {
        Self::new(grid, Genome::random(len, rng))
    }

    /// Fresh game replaying the same genome from the start
    pub fn replay(&self, grid: &Grid) -> Self {
        Self::new(grid, self.genome.clone())
    }

    /// Advance one tick. `manual` replaces the scheduled command for this
    /// tick only; the genome itself is left untouched.
    pub fn step(&mut self, grid: &Grid, tick: usize, manual: Option<Command>) {
        if self.is_complete || self.is_dead {
            self.num_door_steps = self.genome.len();
            self.num_key_steps = self.genome.len();
            return;
        }

        self.num_door_steps += 1;
        if !self.is_key_collected {
            self.num_key_steps += 1;
        }

        let command = manual.unwrap_or_else(|| self.genome.command_at(tick));
        self.move_agent(grid, command);

        if self.hazards.update(grid, self.agent) {
            trace!(tick, agent = %self.agent, "agent killed by hazard");
            self.is_dead = true;
        }

        if self.agent == grid.key() {
            self.is_key_collected = true;
        }

        if grid.is_door(self.agent) {
            trace!(tick, "agent reached the door");
            self.is_complete = true;
        }
    }

    /// Walls, unopened doors and the grid edge reject the move
    fn move_agent(&mut self, grid: &Grid, command: Command) {
        let (dx, dy) = command.to_delta();
        let next = self.agent.add(dx, dy);

        let is_not_wall = !grid.is_wall(next);
        let is_not_door = !grid.is_door(next);

        if is_not_wall && (is_not_door || self.is_key_collected) && grid.in_bounds(next) {
            self.agent = next;
        }
    }

    /// Score the finished run and remember the result.
    ///
    /// Cells missing from a flow field count as one rank past its farthest cell.
    pub fn fitness_score(&mut self, fields: &FlowFields, config: &PopulationConfig) -> f64 {
        let len = self.genome.len() as f64;

        self.fitness = if self.is_complete {
            let key_val = len - self.num_key_steps as f64 + 1.0;
            let door_val = len - self.num_door_steps as f64 + 1.0;
            key_val * 20.0 + door_val * 20.0 + config.ff_weight_threshold * 2.0
        } else if !self.is_key_collected {
            let ff_key = fields.key.rank_or_farthest(self.agent) as f64;
            1000.0 / ff_key
        } else {
            let ff_door = fields.door.rank_or_farthest(self.agent) as f64;
            let f_key = 10.0 + len / self.num_key_steps.max(1) as f64;
            let f_door = 1000.0 / ff_door;
            f_key + f_door + config.key_bonus
        };

        self.fitness
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn hazards(&self) -> &Hazards {
        &self.hazards
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_key_collected(&self) -> bool {
        self.is_key_collected
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn num_key_steps(&self) -> usize {
        self.num_key_steps
    }

    pub fn num_door_steps(&self) -> usize {
        self.num_door_steps
    }

    pub fn status(&self) -> GameStatus {
        if self.is_complete {
            GameStatus::Complete
        } else if self.is_dead {
            GameStatus::Dead
        } else {
            GameStatus::Alive
        }
    }

    pub fn view(&self) -> GameView {
        GameView {
            agent: self.agent,
            is_key_collected: self.is_key_collected,
            is_complete: self.is_complete,
            is_dead: self.is_dead,
            hazards: self.hazards.views(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command::*;

    fn play(grid: &Grid, moves: Vec<Command>) -> Game {
        let mut game = Game::new(grid, Genome::new(moves));
        for tick in 0..game.genome().len() {
            game.step(grid, tick, None);
        }
        game
    }

    #[test]
    fn test_game_creation() {
        let grid = Grid::from_ascii("A.K\n...\n..D").unwrap();
        let game = Game::new(&grid, Genome::new(vec![Right; 4]));
        assert_eq!(game.agent(), Position::new(0, 0));
        assert_eq!(game.status(), GameStatus::Alive);
        assert_eq!(game.fitness(), 0.0);
    }

    #[test]
    fn test_walls_block_movement() {
        let grid = Grid::from_ascii("A#K\n...\n..D").unwrap();
        let game = play(&grid, vec![Right, Up, Left]);
        assert_eq!(game.agent(), Position::new(0, 0));
        assert_eq!(game.num_door_steps(), 3);
    }

    #[test]
    fn test_door_locked_until_key() {
        let grid = Grid::from_ascii("ADK").unwrap();
        let game = play(&grid, vec![Right, Right]);
        assert_eq!(game.agent(), Position::new(0, 0));
        assert!(!game.is_complete());
    }

    #[test]
    fn test_door_opens_with_key() {
        let grid = Grid::from_ascii("KAD").unwrap();
        let game = play(&grid, vec![Left, Right, Right]);
        assert!(game.is_key_collected());
        assert!(game.is_complete());
        assert_eq!(game.num_key_steps(), 1);
        assert_eq!(game.num_door_steps(), 3);
    }

    #[test]
    fn test_terminal_state_pins_counters() {
        let grid = Grid::from_ascii("KAD").unwrap();
        let mut game = play(&grid, vec![Left, Right, Right, Right, Up, Up]);
        assert!(game.is_complete());
        assert_eq!(game.num_key_steps(), 6);
        assert_eq!(game.num_door_steps(), 6);

        let agent = game.agent();
        game.step(&grid, 2, Some(Left));
        assert_eq!(game.agent(), agent);
    }

    #[test]
    fn test_hazard_kills_agent() {
        let grid = Grid::from_ascii("A.s\n..K\n..D").unwrap();
        let game = play(&grid, vec![Right, Right, Down]);
        assert!(game.is_dead());
        assert_eq!(game.status(), GameStatus::Dead);
        assert_eq!(game.agent(), Position::new(2, 0));
    }

    #[test]
    fn test_manual_override_leaves_genome() {
        let grid = Grid::from_ascii("A.K\n...\n..D").unwrap();
        let mut game = Game::new(&grid, Genome::new(vec![Right, Right]));
        game.step(&grid, 0, Some(Down));
        assert_eq!(game.agent(), Position::new(0, 1));
        assert_eq!(game.genome().moves(), &[Right, Right]);
    }

    #[test]
    fn test_tick_past_sequence_defaults_to_up() {
        let grid = Grid::from_ascii("...\nAKD").unwrap();
        let mut game = Game::new(&grid, Genome::new(vec![Right]));
        game.step(&grid, 5, None);
        assert_eq!(game.agent(), Position::new(0, 0));
    }

    #[test]
    fn test_fitness_rewards_closeness_to_key() {
        let grid = Grid::from_ascii("A...K\n....D").unwrap();
        let fields = FlowFields::solve(&grid);
        let config = PopulationConfig::default();

        let mut idle = play(&grid, vec![Up, Up]);
        let mut walker = play(&grid, vec![Right, Right]);
        let idle_fitness = idle.fitness_score(&fields, &config);
        let walker_fitness = walker.fitness_score(&fields, &config);

        assert!(walker_fitness > idle_fitness);
        let rank = fields.key.rank(Position::new(2, 0)).unwrap() as f64;
        assert_eq!(walker_fitness, 1000.0 / rank);
    }

    #[test]
    fn test_fitness_with_key_includes_bonus() {
        let grid = Grid::from_ascii("AK..D").unwrap();
        let fields = FlowFields::solve(&grid);
        let config = PopulationConfig::default();

        let mut game = play(&grid, vec![Right, Right, Up, Up]);
        assert!(game.is_key_collected());
        let fitness = game.fitness_score(&fields, &config);

        // Agent ends at (2, 0), two cells from the door
        let door_rank = fields.door.rank(Position::new(2, 0)).unwrap() as f64;
        let expected = 10.0 + 4.0 / 1.0 + 1000.0 / door_rank + config.key_bonus;
        assert_eq!(fitness, expected);
    }

    #[test]
    fn test_unreachable_position_has_finite_fitness() {
        // The agent is walled off from the key
        let grid = Grid::from_ascii("A#K\n##D").unwrap();
        let fields = FlowFields::solve(&grid);
        let mut game = play(&grid, vec![Right]);
        let fitness = game.fitness_score(&fields, &PopulationConfig::default());
        assert!(fitness.is_finite());
        assert_eq!(fitness, 1000.0 / (fields.key.max_rank() + 1) as f64);
    }

    #[test]
    fn test_view_reflects_state() {
        let grid = Grid::from_ascii("A>KD").unwrap();
        let game = Game::new(&grid, Genome::new(vec![Up]));
        let view = game.view();
        assert_eq!(view.agent, Position::new(0, 0));
        assert_eq!(view.hazards.len(), 1);
        assert!(!view.is_dead);
    }
}
