//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Substeps bounded by `Tuning::max_step`
//! - Seeded RNG only (coin bob phases at construction)
//! - Stable update order (actor list order, spawns appended)
//! - No rendering or platform dependencies

pub mod actor;
pub mod grid;
pub mod input;
pub mod level;
pub mod step;

pub use actor::{Actor, ActorBody, ActorId, ActorKind, LavaMode};
pub use grid::{Cell, Grid};
pub use input::{Direction, Keys};
pub use level::{Level, LevelEvent, Status};
pub use step::{Step, Touch};
