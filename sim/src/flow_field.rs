//! Flood-fill distance field.
//!
//! Ranks are breadth-first visitation order from the source, starting at 1.
//! They grow with true path distance but two cells at the same depth get
//! different ranks depending on enqueue order, so the field is only a cheap
//! closeness proxy for fitness shaping.

use shared::{Grid, Position};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    source: Position,
    ranks: HashMap<Position, u32>,
    max_rank: u32,
}

impl FlowField {
    /// Flood the grid from `source` over 4-connected non-wall cells
    pub fn solve(grid: &Grid, source: Position) -> Self {
        let mut ranks = HashMap::with_capacity(grid.cell_count());
        let mut seen = HashSet::with_capacity(grid.cell_count());
        let mut queue = VecDeque::new();
        let mut weight = 0;

        seen.insert(source);
        queue.push_back(source);

        while let Some(pos) = queue.pop_front() {
            weight += 1;
            ranks.insert(pos, weight);

            for next in pos.neighbors() {
                if grid.is_blocked(next) || !seen.insert(next) {
                    continue;
                }
                queue.push_back(next);
            }
        }

        debug!(%source, reachable = ranks.len(), "flow field solved");

        Self {
            source,
            ranks,
            max_rank: weight,
        }
    }

    pub fn source(&self) -> Position {
        self.source
    }

    /// Rank of a cell, `None` if it was never reached
    pub fn rank(&self, pos: Position) -> Option<u32> {
        self.ranks.get(&pos).copied()
    }

    /// Rank of a cell, treating unreachable cells as one past the farthest one
    pub fn rank_or_farthest(&self, pos: Position) -> u32 {
        self.rank(pos).unwrap_or(self.max_rank + 1)
    }

    pub fn max_rank(&self) -> u32 {
        self.max_rank
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.ranks.iter().map(|(pos, rank)| (*pos, *rank))
    }
}

/// The pair of fields a generation needs for fitness: towards the key and
/// towards the door
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFields {
    pub key: FlowField,
    pub door: FlowField,
}

impl FlowFields {
    pub fn solve(grid: &Grid) -> Self {
        Self {
            key: FlowField::solve(grid, grid.key()),
            door: FlowField::solve(grid, grid.door()),
        }
    }
}
