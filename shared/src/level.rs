//! Level description documents.
//!
//! A level is a set of named tile layers of identical size. Tiles are stored
//! row major (`tiles[y][x]`) and `0` means "nothing here". Besides the JSON
//! form there is a compact ASCII form that is handy for small hand-written
//! mazes and tests.

use crate::error::{Error, Result};
use crate::grid::{LARGE_SPIKE, SMALL_SPIKE, VERTICAL_PATROL};
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LAYER_WALLS: &str = "walls";
pub const LAYER_DOOR: &str = "door";
pub const LAYER_KEY: &str = "key";
pub const LAYER_AGENT_START: &str = "agent_start";
pub const LAYER_PATROLLERS: &str = "patrollers";
pub const LAYER_SPIKES: &str = "spikes";

/// Parameter written for horizontal patrollers and invisible spikes in ASCII levels
const PLAIN_TILE: u32 = 1;

/// One width x height layer of tile values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Vec<u32>>,
}

impl Layer {
    pub fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![0; width.max(0) as usize]; height.max(0) as usize],
        }
    }

    /// Check that the declared size matches the tile rows
    pub fn validate(&self, name: &str) -> Result<()> {
        let malformed = |reason: String| Error::MalformedLayer {
            layer: name.to_string(),
            reason,
        };

        if self.width <= 0 || self.height <= 0 {
            return Err(malformed(format!(
                "size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tiles.len() != self.height as usize {
            return Err(malformed(format!(
                "expected {} rows, found {}",
                self.height,
                self.tiles.len()
            )));
        }
        if let Some((y, row)) = self
            .tiles
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.width as usize)
        {
            return Err(malformed(format!(
                "row {} has {} tiles, expected {}",
                y,
                row.len(),
                self.width
            )));
        }
        Ok(())
    }

    /// Tile value at a cell, `0` outside the layer
    pub fn get(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.tiles
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(0)
    }

    fn set(&mut self, x: i32, y: i32, value: u32) {
        self.tiles[y as usize][x as usize] = value;
    }

    /// All non-empty tiles, scanning column by column (x outer, y inner)
    pub fn items(&self) -> Vec<(Position, u32)> {
        let mut items = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let tile = self.get(x, y);
                if tile != 0 {
                    items.push((Position::new(x, y), tile));
                }
            }
        }
        items
    }
}

/// A complete level document: layers keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub layers: BTreeMap<String, Layer>,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the ASCII form.
    ///
    /// `#` wall, `A` agent start, `K` key, `D` door, `>` horizontal patroller,
    /// `v` vertical patroller, `s` small spike, `S` large spike, `x` invisible
    /// spike, `.` empty. Blank lines are ignored.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        if width == 0 {
            return Err(Error::MalformedLayer {
                layer: "ascii".to_string(),
                reason: "level has no rows".to_string(),
            });
        }

        let mut walls = Layer::empty(width, height);
        let mut door = Layer::empty(width, height);
        let mut key = Layer::empty(width, height);
        let mut agent = Layer::empty(width, height);
        let mut patrollers = Layer::empty(width, height);
        let mut spikes = Layer::empty(width, height);

        for (y, row) in rows.iter().enumerate() {
            let y = y as i32;
            if row.len() as i32 != width {
                return Err(Error::MalformedLayer {
                    layer: "ascii".to_string(),
                    reason: format!("row {} has {} tiles, expected {}", y, row.len(), width),
                });
            }
            for (x, &tile) in row.iter().enumerate() {
                let x = x as i32;
                match tile {
                    '.' => {}
                    '#' => walls.set(x, y, PLAIN_TILE),
                    'A' => agent.set(x, y, PLAIN_TILE),
                    'K' => key.set(x, y, PLAIN_TILE),
                    'D' => door.set(x, y, PLAIN_TILE),
                    '>' => patrollers.set(x, y, PLAIN_TILE),
                    'v' => patrollers.set(x, y, VERTICAL_PATROL),
                    's' => spikes.set(x, y, SMALL_SPIKE),
                    'S' => spikes.set(x, y, LARGE_SPIKE),
                    'x' => spikes.set(x, y, PLAIN_TILE),
                    other => return Err(Error::UnknownTile { tile: other, x, y }),
                }
            }
        }

        let mut layers = BTreeMap::new();
        layers.insert(LAYER_WALLS.to_string(), walls);
        layers.insert(LAYER_DOOR.to_string(), door);
        layers.insert(LAYER_KEY.to_string(), key);
        layers.insert(LAYER_AGENT_START.to_string(), agent);
        layers.insert(LAYER_PATROLLERS.to_string(), patrollers);
        layers.insert(LAYER_SPIKES.to_string(), spikes);
        Ok(Self { layers })
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Fetch a layer that must exist
    pub fn required_layer(&self, name: &str) -> Result<&Layer> {
        self.layer(name)
            .ok_or_else(|| Error::MissingLayer(name.to_string()))
    }
}
