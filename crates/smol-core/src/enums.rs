//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Discrete movement direction produced by keyboard-style input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Unit vector for this direction in screen coordinates (y grows downward).
    /// Diagonals are normalized so every direction moves at the same speed.
    pub fn unit_vector(self) -> Point {
        let v = match self {
            Direction::Up => Point::new(0.0, -1.0),
            Direction::Down => Point::new(0.0, 1.0),
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Right => Point::new(1.0, 0.0),
            Direction::UpLeft => Point::new(-1.0, -1.0),
            Direction::UpRight => Point::new(1.0, -1.0),
            Direction::DownLeft => Point::new(-1.0, 1.0),
            Direction::DownRight => Point::new(1.0, 1.0),
        };
        v.normalize()
    }
}

/// What an entity is. Fixed at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Keyboard-driven character carrying the session's health.
    Player,
    /// Mouse-driven hammer that smashes enemies while it is down.
    Weapon,
    /// Mole that pops up, bites the player on contact and retreats.
    Enemy,
    /// Static blocker the player bounces off.
    Obstacle,
    /// Self-propelled shot that damages what it hits.
    Projectile,
}

/// Scheduler state of the game loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Constructed, thread not spawned yet.
    #[default]
    Created,
    /// Ticking.
    Running,
    /// Loop thread parked after acknowledging a pause.
    Paused,
    /// Shut down. Terminal.
    Stopped,
}

/// Session phase (top-level game state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Active,
    /// An entity died; the session is over.
    Over,
}
