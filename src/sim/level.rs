//! Level state and the fixed-substep simulation loop

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, ActorKind};
use super::grid::Grid;
use super::input::Keys;
use super::step::{Pending, Progress, Step, Touch};
use crate::plan::{Glyph, LevelPlan, PlanError};
use crate::tuning::Tuning;

/// Smallest substep the loop will take, guards against a zero `max_step`
const MIN_STEP: f32 = 1.0e-4;

/// Terminal outcome of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Won,
    Lost,
}

/// Things that happened during an advance, for sounds and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEvent {
    CoinCollected { id: ActorId },
    ArrowFired { enemy: ActorId, arrow: ActorId },
    ArrowBroke { id: ActorId },
    Won,
    Lost,
}

/// A running level: static grid, live actors, and win/lose status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    grid: Grid,
    /// Update order is list order; spawns are appended
    actors: Vec<Actor>,
    progress: Progress,
    tuning: Tuning,
}

impl Level {
    /// Build a level from a validated plan
    ///
    /// `seed` drives the initial coin bob phases.
    pub fn new(plan: &LevelPlan, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::from_plan(plan);
        let mut actors = Vec::new();
        let mut next_id: ActorId = 1;

        for (x, y, glyph) in plan.glyphs() {
            let cell = Vec2::new(x as f32, y as f32);
            let actor = match glyph {
                Glyph::Cell(_) => continue,
                Glyph::Player => Actor::player(next_id, cell),
                Glyph::Coin => {
                    let wobble = rng.random_range(0.0..std::f32::consts::TAU);
                    Actor::coin(next_id, cell, wobble)
                }
                Glyph::Lava(mode) => Actor::lava(next_id, cell, mode),
                Glyph::Enemy => Actor::enemy(next_id, cell, &tuning),
            };
            actors.push(actor);
            next_id += 1;
        }

        log::info!(
            "Level {}x{} with {} actors ({} coins)",
            grid.width(),
            grid.height(),
            actors.len(),
            plan.coin_count()
        );

        Self {
            grid,
            actors,
            progress: Progress::new(next_id),
            tuning,
        }
    }

    /// Validate rows and build a level
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tuning: Tuning, seed: u64) -> Result<Self, PlanError> {
        let plan = LevelPlan::parse(rows)?;
        Ok(Self::new(&plan, tuning, seed))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Live actors in update order
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// The player (always present)
    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|a| a.kind() == ActorKind::Player)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn status(&self) -> Option<Status> {
        self.progress.status
    }

    /// Remaining grace period once a status is set
    pub fn finish_delay(&self) -> Option<f32> {
        self.progress.finish_delay
    }

    /// True once a status is set and its grace period has run out
    pub fn is_finished(&self) -> bool {
        self.progress.status.is_some() && self.progress.finish_delay.is_some_and(|d| d < 0.0)
    }

    pub fn coins_left(&self) -> usize {
        self.actors.iter().filter(|a| a.kind() == ActorKind::Coin).count()
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.progress.events)
    }

    /// Advance the simulation by `dt` seconds of input-driven time
    ///
    /// The time is split into substeps no longer than `tuning.max_step`.
    pub fn advance(&mut self, dt: f32, keys: &Keys) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        if self.progress.status.is_some() {
            if let Some(delay) = self.progress.finish_delay.as_mut() {
                *delay -= dt;
            }
        }

        let max_step = self.tuning.max_step.max(MIN_STEP);
        let mut remaining = dt;
        while remaining > 0.0 {
            let step = remaining.min(max_step);
            self.substep(step, keys);
            remaining -= step;
        }
    }

    /// Run every actor once, then apply queued spawns and removals
    fn substep(&mut self, dt: f32, keys: &Keys) {
        let mut pending = Pending::default();

        for i in 0..self.actors.len() {
            let mut actor = self.actors[i];
            if pending.is_removed(actor.id) {
                continue;
            }
            let mut step = Step::new(
                &self.grid,
                &self.actors,
                &self.tuning,
                &mut self.progress,
                &mut pending,
            );
            actor.act(dt, &mut step, keys);
            self.actors[i] = actor;
        }

        self.apply(pending);
    }

    fn apply(&mut self, pending: Pending) {
        if !pending.removed.is_empty() {
            self.actors.retain(|a| !pending.is_removed(a.id));
        }
        self.actors.extend(pending.spawned);
    }

    /// Apply a player touch outside of a substep
    pub fn player_touched(&mut self, touch: Touch) {
        let mut pending = Pending::default();
        Step::new(
            &self.grid,
            &self.actors,
            &self.tuning,
            &mut self.progress,
            &mut pending,
        )
        .player_touched(touch);
        self.apply(pending);
    }

    /// Append an actor built with a fresh id; returns the id
    pub fn spawn(&mut self, build: impl FnOnce(ActorId) -> Actor) -> ActorId {
        let id = self.progress.next_id;
        self.progress.next_id += 1;
        self.actors.push(build(id));
        id
    }

    /// Remove an actor by id
    ///
    /// Unknown ids are ignored and the player is never removed. Returns whether
    /// an actor was removed.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let before = self.actors.len();
        self.actors
            .retain(|a| a.id != id || a.kind() == ActorKind::Player);
        self.actors.len() != before
    }
}
