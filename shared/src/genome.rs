use crate::types::Command;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A genome is a fixed-length move sequence: one command per tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Genome {
    moves: Vec<Command>,
}

impl Genome {
    pub fn new(moves: Vec<Command>) -> Self {
        Self { moves }
    }

    /// Create a genome of `len` uniformly random commands
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            moves: (0..len).map(|_| Command::random(rng)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[Command] {
        &self.moves
    }

    /// Command for a tick; past the end this is the no-op default
    pub fn command_at(&self, tick: usize) -> Command {
        self.moves.get(tick).copied().unwrap_or_default()
    }

    /// Single-point crossover: our prefix up to `split`, the other's suffix from it
    pub fn crossover_at(&self, other: &Genome, split: usize) -> Genome {
        let split = split.min(self.moves.len()).min(other.moves.len());
        let mut moves = Vec::with_capacity(other.moves.len());
        moves.extend_from_slice(&self.moves[..split]);
        moves.extend_from_slice(&other.moves[split..]);
        Genome { moves }
    }

    /// Cross at a uniformly random split in `[0, len - 1]`
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Genome, rng: &mut R) -> Genome {
        if self.moves.is_empty() {
            return other.clone();
        }
        let split = rng.gen_range(0..self.moves.len());
        self.crossover_at(other, split)
    }

    /// Replace each gene with a random command with probability `probability`
    pub fn mutate<R: Rng + ?Sized>(&mut self, probability: f64, rng: &mut R) {
        for gene in &mut self.moves {
            if rng.gen::<f64>() < probability {
                *gene = Command::random(rng);
            }
        }
    }
}

impl From<Vec<Command>> for Genome {
    fn from(moves: Vec<Command>) -> Self {
        Self::new(moves)
    }
}
