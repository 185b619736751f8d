//! Immutable level grid built once from a level description.

use crate::error::{Error, Result};
use crate::level::{
    Layer, LevelDescription, LAYER_AGENT_START, LAYER_DOOR, LAYER_KEY, LAYER_PATROLLERS,
    LAYER_SPIKES, LAYER_WALLS,
};
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Patroller parameter that selects vertical motion
pub const VERTICAL_PATROL: u32 = 88;
/// Spike parameter for the small visual variant
pub const SMALL_SPIKE: u32 = 101;
/// Spike parameter for the large visual variant
pub const LARGE_SPIKE: u32 = 104;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeVariant {
    Small,
    Large,
    /// Not drawn, but still rotates and still kills
    Invisible,
}

/// Static description of a hazard as placed in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Patrolling { axis: Axis },
    Rotating { variant: SpikeVariant },
}

impl HazardKind {
    pub fn patrolling(parameter: u32) -> Self {
        let axis = if parameter == VERTICAL_PATROL {
            Axis::Vertical
        } else {
            Axis::Horizontal
        };
        HazardKind::Patrolling { axis }
    }

    pub fn rotating(parameter: u32) -> Self {
        let variant = match parameter {
            SMALL_SPIKE => SpikeVariant::Small,
            LARGE_SPIKE => SpikeVariant::Large,
            _ => SpikeVariant::Invisible,
        };
        HazardKind::Rotating { variant }
    }
}

/// A hazard cell with its kind and raw parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardSpawn {
    pub position: Position,
    pub kind: HazardKind,
    pub parameter: u32,
}

/// The static maze: walls, key, door, agent start and hazard placements.
/// Only `load` builds one; no field is public.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    width: i32,
    height: i32,
    walls: Vec<bool>,
    agent_start: Position,
    key: Position,
    door: Position,
    patrollers: Vec<HazardSpawn>,
    spikes: Vec<HazardSpawn>,
}

impl Grid {
    /// Build a grid from a parsed level description.
    ///
    /// The walls layer fixes the grid size; every other layer present must
    /// match it. `agent_start`, `key` and `door` must hold exactly one item.
    pub fn load(description: &LevelDescription) -> Result<Self> {
        let walls_layer = description.required_layer(LAYER_WALLS)?;
        walls_layer.validate(LAYER_WALLS)?;
        let (width, height) = (walls_layer.width, walls_layer.height);

        for (name, layer) in &description.layers {
            layer.validate(name)?;
            if (layer.width, layer.height) != (width, height) {
                return Err(Error::DimensionMismatch {
                    layer: name.clone(),
                    expected: (width, height),
                    found: (layer.width, layer.height),
                });
            }
        }

        let mut walls = vec![false; (width * height) as usize];
        for (pos, _) in walls_layer.items() {
            walls[(pos.y * width + pos.x) as usize] = true;
        }

        let agent_start = one_item(description, LAYER_AGENT_START)?;
        let key = one_item(description, LAYER_KEY)?;
        let door = one_item(description, LAYER_DOOR)?;

        let patrollers = all_items(description.layer(LAYER_PATROLLERS), HazardKind::patrolling);
        let spikes = all_items(description.layer(LAYER_SPIKES), HazardKind::rotating);

        Ok(Self {
            width,
            height,
            walls,
            agent_start,
            key,
            door,
            patrollers,
            spikes,
        })
    }

    /// Parse a JSON level document and build the grid
    pub fn from_json(json: &str) -> Result<Self> {
        Self::load(&LevelDescription::from_json(json)?)
    }

    /// Parse an ASCII level and build the grid
    pub fn from_ascii(text: &str) -> Result<Self> {
        Self::load(&LevelDescription::from_ascii(text)?)
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Wall test; cells outside the grid are not walls
    pub fn is_wall(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.walls[(pos.y * self.width + pos.x) as usize]
    }

    pub fn is_door(&self, pos: Position) -> bool {
        pos == self.door
    }

    /// True for walls and for anything off the grid
    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.is_wall(pos)
    }

    pub fn agent_start(&self) -> Position {
        self.agent_start
    }

    pub fn key(&self) -> Position {
        self.key
    }

    pub fn door(&self) -> Position {
        self.door
    }

    pub fn patrollers(&self) -> &[HazardSpawn] {
        &self.patrollers
    }

    pub fn spikes(&self) -> &[HazardSpawn] {
        &self.spikes
    }

    /// Every hazard cell: patrollers first, then spikes, each in level order
    pub fn hazards(&self) -> impl Iterator<Item = &HazardSpawn> + '_ {
        self.patrollers.iter().chain(self.spikes.iter())
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

fn one_item(description: &LevelDescription, name: &str) -> Result<Position> {
    let items = description.required_layer(name)?.items();
    match items.as_slice() {
        [] => Err(Error::EmptyLayer(name.to_string())),
        [(pos, _)] => Ok(*pos),
        _ => Err(Error::MultipleItems {
            layer: name.to_string(),
            count: items.len(),
        }),
    }
}

fn all_items(layer: Option<&Layer>, kind: fn(u32) -> HazardKind) -> Vec<HazardSpawn> {
    layer
        .map(|layer| {
            layer
                .items()
                .into_iter()
                .map(|(position, parameter)| HazardSpawn {
                    position,
                    kind: kind(parameter),
                    parameter,
                })
                .collect()
        })
        .unwrap_or_default()
}
