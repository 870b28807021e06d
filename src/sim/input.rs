//! Directional input snapshot
//!
//! Maintained by the host (keyboard, gamepad, script) and read by the
//! simulation on every advance. The simulation never writes to it.

use serde::{Deserialize, Serialize};

/// Logical direction a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
}

impl Direction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" | "jump" => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Which directions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl Keys {
    pub fn held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
        }
    }

    /// Record a press or release (host side)
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
        }
    }

    /// -1 for left only, +1 for right only, 0 for neither or both
    #[inline]
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
