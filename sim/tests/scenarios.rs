use shared::{Command, Genome, Grid, PopulationConfig, Position};
use sim::{FlowFields, Game, GameStatus, Population};
use std::sync::Arc;

use Command::{Down, Left, Right, Up};

fn open_three_by_three() -> Grid {
    Grid::from_ascii(
        "
        A.K
        ...
        ..D
        ",
    )
    .unwrap()
}

fn play(grid: &Grid, moves: &[Command]) -> Game {
    let mut game = Game::new(grid, Genome::new(moves.to_vec()));
    for tick in 0..moves.len() {
        game.step(grid, tick, None);
    }
    game
}

#[test]
fn key_then_door_on_open_grid() {
    let grid = open_three_by_three();
    let fields = FlowFields::solve(&grid);
    let config = PopulationConfig {
        num_frames: 4,
        ..Default::default()
    };

    let mut game = play(&grid, &[Right, Right, Down, Down]);

    assert_eq!(game.num_key_steps(), 2);
    assert_eq!(game.num_door_steps(), 4);
    assert!(game.is_key_collected());
    assert!(game.is_complete());
    assert!(!game.is_dead());
    assert_eq!(game.status(), GameStatus::Complete);
    assert_eq!(game.agent(), Position::new(2, 2));

    let len = 4.0;
    let expected = (len - 2.0 + 1.0) * 20.0 + (len - 4.0 + 1.0) * 20.0 + config.ff_weight_threshold * 2.0;
    assert_eq!(game.fitness_score(&fields, &config), expected);
}

#[test]
fn replaying_a_genome_is_deterministic() {
    let grid = Grid::from_ascii(
        "
        #########
        #A..>..K#
        #.#####.#
        #.s...vD#
        #########
        ",
    )
    .unwrap();
    let fields = FlowFields::solve(&grid);
    let config = PopulationConfig::default();
    let moves = [
        Right, Right, Down, Right, Right, Up, Right, Right, Right, Down, Down, Left, Down, Right,
    ];

    let mut first = play(&grid, &moves);
    let mut second = play(&grid, &moves);

    assert_eq!(first.agent(), second.agent());
    assert_eq!(first.is_complete(), second.is_complete());
    assert_eq!(first.is_dead(), second.is_dead());
    assert_eq!(
        first.fitness_score(&fields, &config),
        second.fitness_score(&fields, &config)
    );
    assert_eq!(first.view(), second.view());
}

#[test]
fn population_finds_the_door_in_a_corridor() {
    let grid = Arc::new(
        Grid::from_ascii(
            "
            #######
            #A..K.#
            #####D#
            ",
        )
        .unwrap(),
    );
    let config = PopulationConfig {
        population_size: 40,
        num_frames: 12,
        mutation_probability: 0.05,
        seed: 21,
        ..Default::default()
    };
    let mut population = Population::new(grid, config).unwrap();

    let mut best = 0.0f64;
    for _ in 0..30 {
        for tick in 0..12 {
            population.update(tick, None, true);
        }
        let summary = population.selection();
        assert!(summary.best_fitness >= best);
        best = summary.best_fitness;
    }

    // Holding the key is worth more than any key-distance score
    assert!(best > 1000.0);
}
