//! Hazard motion model: patrolling crabs and rotating spikes.

use serde::{Deserialize, Serialize};
use shared::{Axis, Grid, HazardKind, HazardSpawn, Position, SpikeVariant};
use std::f32::consts::PI;

/// Degrees a spike turns every tick
pub const SPIKE_TURN_DEGREES: f32 = 10.0;

/// Per-kind motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Walks back and forth along one axis. `direction == false` means +x
    /// for horizontal patrollers and -y for vertical ones.
    Patrolling { axis: Axis, direction: bool },
    /// Stationary, spinning in place
    Rotating { angle: f32, variant: SpikeVariant },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    position: Position,
    motion: Motion,
}

/// What a renderer needs to draw one hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardView {
    pub position: Position,
    /// Rotation in radians
    pub orientation: f32,
    pub scale: f32,
    pub visible: bool,
}

impl Hazard {
    pub fn spawn(spawn: &HazardSpawn) -> Self {
        let motion = match spawn.kind {
            HazardKind::Patrolling { axis } => Motion::Patrolling {
                axis,
                direction: false,
            },
            HazardKind::Rotating { variant } => Motion::Rotating {
                angle: 0.0,
                variant,
            },
        };
        Self {
            position: spawn.position,
            motion,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Advance one tick.
    ///
    /// A patroller whose next cell is blocked flips direction and moves two
    /// cells the new way from where it stands. If that landing cell is
    /// blocked too it stays put for the tick.
    pub fn update(&mut self, grid: &Grid) {
        match &mut self.motion {
            Motion::Patrolling { axis, direction } => {
                let step = patrol_step(*axis, *direction);
                let next = self.position.add(step.0, step.1);
                if grid.is_blocked(next) {
                    *direction = !*direction;
                    let back = patrol_step(*axis, *direction);
                    let landing = self.position.add(back.0 * 2, back.1 * 2);
                    if !grid.is_blocked(landing) {
                        self.position = landing;
                    }
                } else {
                    self.position = next;
                }
            }
            Motion::Rotating { angle, .. } => {
                *angle = (*angle + SPIKE_TURN_DEGREES) % 360.0;
            }
        }
    }

    pub fn view(&self) -> HazardView {
        let (orientation, scale, visible) = match self.motion {
            Motion::Rotating { angle, variant } => match variant {
                SpikeVariant::Small => (angle.to_radians(), 1.0, true),
                SpikeVariant::Large => (angle.to_radians(), 2.0, true),
                SpikeVariant::Invisible => (angle.to_radians(), 1.0, false),
            },
            Motion::Patrolling {
                axis: Axis::Vertical,
                direction,
            } => (if direction { PI } else { 0.0 }, 1.0, true),
            Motion::Patrolling {
                axis: Axis::Horizontal,
                direction,
            } => (if direction { PI * 1.5 } else { PI / 2.0 }, 1.0, true),
        };
        HazardView {
            position: self.position,
            orientation,
            scale,
            visible,
        }
    }
}

fn patrol_step(axis: Axis, direction: bool) -> (i32, i32) {
    match (axis, direction) {
        (Axis::Horizontal, false) => (1, 0),
        (Axis::Horizontal, true) => (-1, 0),
        (Axis::Vertical, false) => (0, -1),
        (Axis::Vertical, true) => (0, 1),
    }
}

/// All hazards of one individual's world, patrollers ahead of spikes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazards {
    patrollers: Vec<Hazard>,
    spikes: Vec<Hazard>,
}

impl Hazards {
    pub fn new(grid: &Grid) -> Self {
        Self {
            patrollers: grid.patrollers().iter().map(Hazard::spawn).collect(),
            spikes: grid.spikes().iter().map(Hazard::spawn).collect(),
        }
    }

    /// Move every hazard, then report whether any now sits on `agent`
    pub fn update(&mut self, grid: &Grid, agent: Position) -> bool {
        for hazard in self.patrollers.iter_mut().chain(self.spikes.iter_mut()) {
            hazard.update(grid);
        }
        self.iter().any(|hazard| hazard.position() == agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hazard> + '_ {
        self.patrollers.iter().chain(self.spikes.iter())
    }

    pub fn views(&self) -> Vec<HazardView> {
        self.iter().map(Hazard::view).collect()
    }

    pub fn len(&self) -> usize {
        self.patrollers.len() + self.spikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
