//! Core type definitions shared by the level model and the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinate on the level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The 4-connected neighbours in flood-fill order: right, left, down, up
    pub fn neighbors(&self) -> [Position; 4] {
        [
            self.add(1, 0),
            self.add(-1, 0),
            self.add(0, 1),
            self.add(0, -1),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single gene: one movement command for one tick.
///
/// The discriminants match the encoding used in move sequences, and `Up`
/// doubles as the no-op fallback when a tick runs past the sequence end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Command {
    #[default]
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Up, Command::Left, Command::Down, Command::Right];

    /// Decode a gene value; anything above 2 maps to `Right`
    pub fn from_index(value: u8) -> Self {
        match value {
            0 => Command::Up,
            1 => Command::Left,
            2 => Command::Down,
            _ => Command::Right,
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Command::Up => (0, -1),
            Command::Left => (-1, 0),
            Command::Down => (0, 1),
            Command::Right => (1, 0),
        }
    }

    /// Draw a uniformly random command
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_index(rng.gen_range(0..4))
    }
}
