//! Player controller
//!
//! Movement is camera-relative with axis-separated wall sliding; vertical
//! motion is gravity plus a hard ground clamp; melee attacks are gated by a
//! cooldown the step itself winds down. The sub-step order here is fixed:
//! facing, horizontal move, vertical move, attack gate. The camera-follow
//! write happens in the tick, after every actor has moved.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_HEIGHT;
use crate::sim::actor::ActorState;
use crate::sim::collision::CollisionField;
use crate::sim::input::InputSnapshot;
use crate::tuning::Tuning;
use crate::{rotate_by_yaw, wrap_angle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub actor: ActorState,
    /// Seconds until the next swing is allowed; ticks down every step and
    /// is deliberately not clamped at zero
    pub attack_cooldown: f32,
    pub attack_rate: f32,
    pub attack_damage: i32,
    pub attack_range: f32,
    pub is_on_ground: bool,

    // Movement parameters, copied from tuning at spawn
    pub speed: f32,
    pub sprint_multiplier: f32,
    pub rotation_smoothing: f32,
    pub jump_force: f32,
    pub gravity: f32,
}

impl Player {
    pub fn from_tuning(tuning: &Tuning, position: Vec3) -> Player {
        Player {
            actor: ActorState::new(position, tuning.player_health, tuning.player_radius),
            attack_cooldown: 0.0,
            attack_rate: tuning.attack_rate,
            attack_damage: tuning.attack_damage,
            attack_range: tuning.attack_range,
            is_on_ground: true,
            speed: tuning.player_speed,
            sprint_multiplier: tuning.sprint_multiplier,
            rotation_smoothing: tuning.rotation_smoothing,
            jump_force: tuning.jump_force,
            gravity: tuning.gravity,
        }
    }

    /// Advance the player one step. Returns true when a melee swing fired
    /// this step (attack held and the cooldown wound down).
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        camera_yaw: f32,
        field: &CollisionField,
        dt: f32,
    ) -> bool {
        if self.actor.is_dead {
            return false;
        }

        // Facing: blend toward the heading the input asks for
        let dir = input.move_dir.normalize_or_zero();
        if dir != Vec2::ZERO {
            let target_yaw = dir.x.atan2(dir.y);
            let blend = (self.rotation_smoothing * dt).min(1.0);
            self.actor.yaw += wrap_angle(target_yaw - self.actor.yaw) * blend;
        }

        // Horizontal: camera-relative, axis-separated against walls
        let mult = if input.sprint {
            self.sprint_multiplier
        } else {
            1.0
        };
        let delta = rotate_by_yaw(dir, camera_yaw) * self.speed * mult * dt;
        self.move_with_slide(delta, field);

        // Vertical: gravity, ground clamp, jump, integrate, in that order
        self.actor.velocity.y -= self.gravity * dt;
        if self.actor.position.y <= GROUND_HEIGHT {
            self.actor.position.y = GROUND_HEIGHT;
            self.actor.velocity.y = 0.0;
            self.is_on_ground = true;
        } else {
            self.is_on_ground = false;
        }
        if self.is_on_ground && input.jump {
            self.actor.velocity.y = self.jump_force;
            self.is_on_ground = false;
        }
        self.actor.position.y += self.actor.velocity.y * dt;

        // Attack gate
        self.attack_cooldown -= dt;
        if input.attack && self.attack_cooldown <= 0.0 {
            self.attack_cooldown = self.attack_rate;
            return true;
        }
        false
    }

    /// Tentative full move; on overlap retry X-only then Z-only so the
    /// player slides along walls instead of sticking to them
    fn move_with_slide(&mut self, delta: Vec2, field: &CollisionField) {
        if delta == Vec2::ZERO {
            return;
        }
        let radius = self.actor.collision_radius;
        let from = self.actor.planar_position();
        let mut to = from + delta;
        if field.overlaps_wall(to, radius) {
            to = from;
            let x_only = Vec2::new(from.x + delta.x, from.y);
            if !field.overlaps_wall(x_only, radius) {
                to.x = x_only.x;
            }
            let z_only = Vec2::new(to.x, from.y + delta.y);
            if !field.overlaps_wall(z_only, radius) {
                to.y = z_only.y;
            }
        }
        self.actor.position.x = to.x;
        self.actor.position.z = to.y;
    }
}
