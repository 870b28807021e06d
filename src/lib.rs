//! Tile Runner - a tile-based platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, actors, substep physics, level state)
//! - `plan`: Level plan parsing and level sets
//! - `tuning`: Data-driven physics constants
//! - `runner`: Frame driver with pause and completion callback
//!
//! Rendering and keyboard wiring live outside this crate: a renderer reads
//! [`sim::Level`] state, and the host feeds a [`sim::Keys`] snapshot each frame.

pub mod plan;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use plan::{LevelPlan, LevelSet, PlanError};
pub use runner::Runner;
pub use sim::{Actor, ActorKind, Cell, Grid, Keys, Level, LevelEvent, Status};
pub use tuning::{ConfigError, Tuning};

/// Fixed geometry of spawned actors, in cell units
pub mod consts {
    use glam::Vec2;

    /// Player body size
    pub const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.5);
    /// Player spawns half a cell above its plan cell so it stands on the row below
    pub const PLAYER_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, -0.5);

    /// Enemy body size (same silhouette as the player)
    pub const ENEMY_SIZE: Vec2 = Vec2::new(0.8, 1.5);
    pub const ENEMY_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, -0.5);

    pub const COIN_SIZE: Vec2 = Vec2::new(0.5, 0.6);
    pub const COIN_SPAWN_OFFSET: Vec2 = Vec2::new(0.2, 0.1);

    pub const LAVA_SIZE: Vec2 = Vec2::new(1.0, 1.0);
    /// Sweep speed of `=` and `|` lava
    pub const LAVA_SWEEP_SPEED: f32 = 2.0;
    /// Fall speed of `v` lava
    pub const LAVA_DRIP_SPEED: f32 = 3.0;

    pub const ARROW_SIZE: Vec2 = Vec2::new(1.0, 0.5);
}
