//! Actors and their per-substep update rules
//!
//! Every actor is an axis-aligned box with a velocity. The variant-specific
//! state lives in [`ActorBody`]; [`Actor::act`] dispatches on it so the level
//! loop never needs to know which kind it is advancing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::input::Keys;
use super::level::{LevelEvent, Status};
use super::step::{Step, Touch};
use crate::consts::*;
use crate::tuning::Tuning;

/// Level-unique actor identifier (monotonic, never reused)
pub type ActorId = u32;

/// Actor discriminator used by interaction rules and renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy,
    Arrow,
    Lava,
    Coin,
}

impl ActorKind {
    /// CSS-style name a renderer can use as a style hint
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::Enemy => "enemy",
            ActorKind::Arrow => "arrow",
            ActorKind::Lava => "lava",
            ActorKind::Coin => "coin",
        }
    }
}

/// How a lava actor moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LavaMode {
    /// Sweeps left and right, bouncing off obstacles
    Horizontal,
    /// Sweeps up and down, bouncing off obstacles
    Vertical,
    /// Falls and restarts from its spawn cell when it lands
    Dripping,
}

/// Variant-specific actor state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorBody {
    Player,
    Enemy {
        /// +1 facing right, -1 facing left
        facing: f32,
        /// Seconds until the next shot is allowed (ready at <= 0)
        cooldown: f32,
    },
    Arrow {
        direction: f32,
    },
    Lava {
        mode: LavaMode,
        /// Where dripping lava restarts after landing
        reset_pos: Option<Vec2>,
    },
    Coin {
        base_pos: Vec2,
        /// Phase of the vertical bob
        wobble: f32,
    },
}

/// A moving (or bobbing) thing in the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: Vec2,
    pub body: ActorBody,
}

impl Actor {
    /// Player spawned at a plan cell
    pub fn player(id: ActorId, cell: Vec2) -> Self {
        Self {
            id,
            pos: cell + PLAYER_SPAWN_OFFSET,
            size: PLAYER_SIZE,
            speed: Vec2::ZERO,
            body: ActorBody::Player,
        }
    }

    /// Enemy spawned at a plan cell, walking right
    pub fn enemy(id: ActorId, cell: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            pos: cell + ENEMY_SPAWN_OFFSET,
            size: ENEMY_SIZE,
            speed: Vec2::new(tuning.enemy_speed, 0.0),
            body: ActorBody::Enemy {
                facing: 1.0,
                cooldown: 0.0,
            },
        }
    }

    /// Projectile launched from `pos` toward `direction` (sign only)
    pub fn arrow(id: ActorId, pos: Vec2, direction: f32, tuning: &Tuning) -> Self {
        let direction = if direction > 0.0 { 1.0 } else { -1.0 };
        Self {
            id,
            pos,
            size: ARROW_SIZE,
            speed: Vec2::new(direction * tuning.arrow_speed, 0.0),
            body: ActorBody::Arrow { direction },
        }
    }

    pub fn lava(id: ActorId, cell: Vec2, mode: LavaMode) -> Self {
        let (speed, reset_pos) = match mode {
            LavaMode::Horizontal => (Vec2::new(LAVA_SWEEP_SPEED, 0.0), None),
            LavaMode::Vertical => (Vec2::new(0.0, LAVA_SWEEP_SPEED), None),
            LavaMode::Dripping => (Vec2::new(0.0, LAVA_DRIP_SPEED), Some(cell)),
        };
        Self {
            id,
            pos: cell,
            size: LAVA_SIZE,
            speed,
            body: ActorBody::Lava { mode, reset_pos },
        }
    }

    /// Coin spawned at a plan cell with an initial bob phase
    pub fn coin(id: ActorId, cell: Vec2, wobble: f32) -> Self {
        let base_pos = cell + COIN_SPAWN_OFFSET;
        Self {
            id,
            pos: base_pos,
            size: COIN_SIZE,
            speed: Vec2::ZERO,
            body: ActorBody::Coin { base_pos, wobble },
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self.body {
            ActorBody::Player => ActorKind::Player,
            ActorBody::Enemy { .. } => ActorKind::Enemy,
            ActorBody::Arrow { .. } => ActorKind::Arrow,
            ActorBody::Lava { .. } => ActorKind::Lava,
            ActorBody::Coin { .. } => ActorKind::Coin,
        }
    }

    /// Strict AABB overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Actor) -> bool {
        self.pos.x + self.size.x > other.pos.x
            && self.pos.x < other.pos.x + other.size.x
            && self.pos.y + self.size.y > other.pos.y
            && self.pos.y < other.pos.y + other.size.y
    }

    /// Advance this actor by one substep
    pub fn act(&mut self, dt: f32, step: &mut Step<'_>, keys: &Keys) {
        match self.body {
            ActorBody::Player => self.act_player(dt, step, keys),
            ActorBody::Enemy { .. } => self.act_enemy(dt, step),
            ActorBody::Arrow { .. } => self.act_arrow(dt, step),
            ActorBody::Lava { .. } => self.act_lava(dt, step),
            ActorBody::Coin { .. } => self.act_coin(dt, step),
        }
    }

    fn act_player(&mut self, dt: f32, step: &mut Step<'_>, keys: &Keys) {
        let tuning = step.tuning();

        // Horizontal: speed comes straight from input every substep
        self.speed.x = keys.horizontal() * tuning.player_x_speed;
        let new_pos = self.pos + Vec2::new(self.speed.x * dt, 0.0);
        match step.obstacle_at(new_pos, self.size) {
            Cell::Empty => self.pos = new_pos,
            cell => step.player_touched(Touch::Cell(cell)),
        }

        // Vertical: gravity accumulates, no terminal velocity
        self.speed.y += dt * tuning.gravity;
        let new_pos = self.pos + Vec2::new(0.0, self.speed.y * dt);
        match step.obstacle_at(new_pos, self.size) {
            Cell::Empty => self.pos = new_pos,
            cell => {
                step.player_touched(Touch::Cell(cell));
                if keys.up && self.speed.y > 0.0 {
                    self.speed.y = -tuning.jump_speed;
                } else {
                    self.speed.y = 0.0;
                }
            }
        }

        let touch = step.actor_at(self).map(|other| Touch::Actor {
            kind: other.kind(),
            id: other.id,
        });
        if let Some(touch) = touch {
            step.player_touched(touch);
        }

        // Death squash, cosmetic only
        if step.status() == Some(Status::Lost) {
            self.pos.y += dt;
            self.size.y = (self.size.y - dt).max(0.0);
        }
    }

    fn act_enemy(&mut self, dt: f32, step: &mut Step<'_>) {
        let ActorBody::Enemy {
            mut facing,
            mut cooldown,
        } = self.body
        else {
            return;
        };
        let tuning = step.tuning();

        let new_pos = self.pos + self.speed * dt;
        let ahead_x = if facing > 0.0 {
            self.pos.x + self.size.x
        } else {
            self.pos.x - self.size.x
        };
        // Solid footing one row below the next stride
        let footing = step.obstacle_at(Vec2::new(ahead_x, self.pos.y + 1.0), self.size) == Cell::Wall;

        if !step.obstacle_at(new_pos, self.size).is_empty() || !footing {
            facing = -facing;
            self.speed = -self.speed;
        } else {
            self.pos = new_pos;
        }

        cooldown = (cooldown - dt).max(0.0);
        if cooldown <= 0.0 && step.player_in_sight(self.pos, self.size, facing) {
            let arrow_id = step.next_id();
            step.spawn(Actor::arrow(arrow_id, self.pos, facing, tuning));
            step.emit(LevelEvent::ArrowFired {
                enemy: self.id,
                arrow: arrow_id,
            });
            log::debug!("Enemy {} fired arrow {}", self.id, arrow_id);
            cooldown = tuning.fire_cooldown;
        }

        self.body = ActorBody::Enemy { facing, cooldown };
    }

    fn act_arrow(&mut self, dt: f32, step: &mut Step<'_>) {
        let new_pos = self.pos + self.speed * dt;
        if step.obstacle_at(new_pos, self.size).is_empty() {
            self.pos = new_pos;
        } else if step.remove(self.id) {
            step.emit(LevelEvent::ArrowBroke { id: self.id });
            log::debug!("Arrow {} broke at ({:.2}, {:.2})", self.id, new_pos.x, new_pos.y);
        }
    }

    fn act_lava(&mut self, dt: f32, step: &mut Step<'_>) {
        let new_pos = self.pos + self.speed * dt;
        if step.obstacle_at(new_pos, self.size).is_empty() {
            self.pos = new_pos;
        } else if let ActorBody::Lava {
            reset_pos: Some(reset),
            ..
        } = self.body
        {
            self.pos = reset;
        } else {
            self.speed = -self.speed;
        }
    }

    fn act_coin(&mut self, dt: f32, step: &mut Step<'_>) {
        let tuning = step.tuning();
        if let ActorBody::Coin {
            base_pos,
            ref mut wobble,
        } = self.body
        {
            *wobble += dt * tuning.wobble_speed;
            self.pos = base_pos + Vec2::new(0.0, wobble.sin() * tuning.wobble_dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_geometry() {
        let cell = Vec2::new(3.0, 4.0);
        let player = Actor::player(1, cell);
        assert_eq!(player.pos, Vec2::new(3.0, 3.5));
        assert_eq!(player.size, Vec2::new(0.8, 1.5));
        assert_eq!(player.kind(), ActorKind::Player);

        let coin = Actor::coin(2, cell, 0.0);
        assert_eq!(coin.pos, Vec2::new(3.2, 4.1));
        assert_eq!(coin.kind(), ActorKind::Coin);

        let drip = Actor::lava(3, cell, LavaMode::Dripping);
        assert_eq!(drip.speed, Vec2::new(0.0, 3.0));
        assert!(matches!(drip.body, ActorBody::Lava { reset_pos: Some(p), .. } if p == cell));

        let sweep = Actor::lava(4, cell, LavaMode::Horizontal);
        assert_eq!(sweep.speed, Vec2::new(2.0, 0.0));
        assert!(matches!(sweep.body, ActorBody::Lava { reset_pos: None, .. }));
    }

    #[test]
    fn test_arrow_direction_sign() {
        let tuning = Tuning::default();
        let left = Actor::arrow(1, Vec2::ZERO, -0.3, &tuning);
        assert_eq!(left.speed, Vec2::new(-3.0, 0.0));
        let right = Actor::arrow(2, Vec2::ZERO, 5.0, &tuning);
        assert_eq!(right.speed, Vec2::new(3.0, 0.0));
        assert_eq!(right.kind(), ActorKind::Arrow);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Actor::lava(1, Vec2::new(0.0, 0.0), LavaMode::Vertical);
        let b = Actor::lava(2, Vec2::new(1.0, 0.0), LavaMode::Vertical);
        let c = Actor::lava(3, Vec2::new(0.5, 0.5), LavaMode::Vertical);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
