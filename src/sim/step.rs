//! Per-substep view of a level handed to actor update rules
//!
//! Actors query obstacles and other actors through [`Step`] and report
//! touches, spawns and removals back through it. Spawns and removals are
//! queued and only applied by the level once every actor has acted, so the
//! actor list never changes in the middle of a pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, ActorKind};
use super::grid::{Cell, Grid};
use super::level::{LevelEvent, Status};
use crate::tuning::Tuning;

/// Something the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touch {
    /// A static obstacle (including the world edges)
    Cell(Cell),
    /// Another actor
    Actor { kind: ActorKind, id: ActorId },
}

/// Mutable level bookkeeping shared between the level and its substeps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Progress {
    pub status: Option<Status>,
    pub finish_delay: Option<f32>,
    pub next_id: ActorId,
    #[serde(skip)]
    pub events: Vec<LevelEvent>,
}

impl Progress {
    pub fn new(next_id: ActorId) -> Self {
        Self {
            status: None,
            finish_delay: None,
            next_id,
            events: Vec::new(),
        }
    }
}

/// Actor list changes queued during a pass
#[derive(Debug, Default)]
pub(crate) struct Pending {
    pub removed: Vec<ActorId>,
    pub spawned: Vec<Actor>,
}

impl Pending {
    pub fn is_removed(&self, id: ActorId) -> bool {
        self.removed.contains(&id)
    }
}

/// Borrowed level state for one actor's update
pub struct Step<'a> {
    grid: &'a Grid,
    actors: &'a [Actor],
    tuning: &'a Tuning,
    progress: &'a mut Progress,
    pending: &'a mut Pending,
}

impl<'a> Step<'a> {
    pub(crate) fn new(
        grid: &'a Grid,
        actors: &'a [Actor],
        tuning: &'a Tuning,
        progress: &'a mut Progress,
        pending: &'a mut Pending,
    ) -> Self {
        Self {
            grid,
            actors,
            tuning,
            progress,
            pending,
        }
    }

    #[inline]
    pub fn tuning(&self) -> &'a Tuning {
        self.tuning
    }

    #[inline]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn status(&self) -> Option<Status> {
        self.progress.status
    }

    /// Obstacle classification of a box
    #[inline]
    pub fn obstacle_at(&self, pos: Vec2, size: Vec2) -> Cell {
        self.grid.classify(pos, size)
    }

    /// First other live actor overlapping `actor`, in list order
    pub fn actor_at(&self, actor: &Actor) -> Option<&'a Actor> {
        let actors = self.actors;
        actors
            .iter()
            .filter(|other| other.id != actor.id && !self.pending.is_removed(other.id))
            .find(|other| actor.overlaps(other))
    }

    pub fn player(&self) -> Option<&'a Actor> {
        let actors = self.actors;
        actors.iter().find(|a| a.kind() == ActorKind::Player)
    }

    /// Whether an observer at `pos`/`size` looking toward `facing` can see the player
    ///
    /// The player must be on the facing side, share part of the observer's
    /// vertical span, and the cells between them over that shared band must be
    /// empty.
    pub fn player_in_sight(&self, pos: Vec2, size: Vec2, facing: f32) -> bool {
        let Some(player) = self.player() else {
            return false;
        };

        let ahead = if facing > 0.0 {
            player.pos.x > pos.x
        } else {
            player.pos.x < pos.x
        };
        let top = pos.y.max(player.pos.y);
        let bottom = (pos.y + size.y).min(player.pos.y + player.size.y);
        if !ahead || top >= bottom {
            return false;
        }

        let (from, to) = if facing > 0.0 {
            (pos.x + size.x, player.pos.x)
        } else {
            (player.pos.x + player.size.x, pos.x)
        };
        if to <= from {
            // Touching or overlapping: nothing in between
            return true;
        }
        self.grid
            .classify(Vec2::new(from, top), Vec2::new(to - from, bottom - top))
            .is_empty()
    }

    /// Allocate an id for an actor about to be spawned
    pub fn next_id(&mut self) -> ActorId {
        let id = self.progress.next_id;
        self.progress.next_id += 1;
        id
    }

    /// Queue an actor to be appended after this pass
    pub fn spawn(&mut self, actor: Actor) {
        self.pending.spawned.push(actor);
    }

    /// Queue an actor for removal after this pass
    ///
    /// Returns false (and does nothing) if the id is unknown, already queued,
    /// or belongs to the player.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let removable = self
            .actors
            .iter()
            .any(|a| a.id == id && a.kind() != ActorKind::Player);
        if !removable || self.pending.is_removed(id) {
            return false;
        }
        self.pending.removed.push(id);
        true
    }

    pub fn emit(&mut self, event: LevelEvent) {
        self.progress.events.push(event);
    }

    /// Apply the interaction rules for a player touch
    ///
    /// The first terminal touch wins; once a status is set every later touch
    /// is ignored.
    pub fn player_touched(&mut self, touch: Touch) {
        if self.progress.status.is_some() {
            return;
        }

        match touch {
            Touch::Cell(Cell::Lava)
            | Touch::Actor {
                kind: ActorKind::Lava | ActorKind::Arrow,
                ..
            } => self.finish(Status::Lost),
            Touch::Actor {
                kind: ActorKind::Coin,
                id,
            } => {
                if !self.remove(id) {
                    return;
                }
                self.emit(LevelEvent::CoinCollected { id });
                log::debug!("Coin {} collected", id);

                let coins_left = self
                    .actors
                    .iter()
                    .any(|a| a.kind() == ActorKind::Coin && !self.pending.is_removed(a.id));
                if !coins_left {
                    self.finish(Status::Won);
                }
            }
            // Walls block without consequence; enemy bodies are harmless
            _ => {}
        }
    }

    fn finish(&mut self, status: Status) {
        self.progress.status = Some(status);
        self.progress.finish_delay = Some(self.tuning.finish_delay);
        self.emit(match status {
            Status::Won => LevelEvent::Won,
            Status::Lost => LevelEvent::Lost,
        });
        log::info!("Level {:?}", status);
    }
}
