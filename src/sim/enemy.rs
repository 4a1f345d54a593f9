//! Orbiting enemy
//!
//! The prototype enemy patrols a circle around the world origin and never
//! reacts to the player. Detection and attack radii are tracked so the
//! awareness state shows up in logs and debug views, but motion stays the
//! orbit; contact damage is the only threat it poses.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_HEIGHT;
use crate::sim::actor::ActorState;
use crate::tuning::Tuning;

/// Awareness bookkeeping; never alters motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BehaviorState {
    #[default]
    Idle,
    Chase,
    Attack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub actor: ActorState,
    /// Health drained from the player per step of contact
    pub damage: i32,
    pub detection_radius: f32,
    pub attack_radius: f32,
    pub behavior: BehaviorState,

    // Orbit parameters, copied from tuning at spawn
    pub speed: f32,
    pub orbit_radius: f32,
    pub orbit_angular_speed: f32,
    pub gravity: f32,
}

impl Enemy {
    pub fn from_tuning(tuning: &Tuning, id: u32, position: Vec3) -> Enemy {
        Enemy {
            id,
            actor: ActorState::new(position, tuning.enemy_health, tuning.enemy_radius),
            damage: tuning.enemy_contact_damage,
            detection_radius: tuning.enemy_detection_radius,
            attack_radius: tuning.enemy_attack_radius,
            behavior: BehaviorState::Idle,
            speed: tuning.enemy_speed,
            orbit_radius: tuning.orbit_radius,
            orbit_angular_speed: tuning.orbit_angular_speed,
            gravity: tuning.gravity,
        }
    }

    /// Point on the patrol circle for a given elapsed time
    #[inline]
    pub fn orbit_target(&self, elapsed: f32) -> Vec2 {
        let angle = elapsed * self.orbit_angular_speed;
        Vec2::new(angle.cos(), angle.sin()) * self.orbit_radius
    }

    /// Advance one step: walk toward the moving orbit target at constant
    /// speed (clamped so a long step cannot cross past it), face the walk
    /// direction, then the same gravity block every actor gets. Walls are
    /// ignored; the orbit does not consult the collision field.
    pub fn update(&mut self, elapsed: f32, dt: f32) {
        if self.actor.is_dead {
            return;
        }

        let target = self.orbit_target(elapsed);
        let to_target = target - self.actor.planar_position();
        let dist = to_target.length();
        if dist > 1e-6 {
            let dir = to_target / dist;
            let step = (self.speed * dt).min(dist);
            self.actor.position.x += dir.x * step;
            self.actor.position.z += dir.y * step;
            self.actor.yaw = dir.x.atan2(dir.y);
        }

        self.actor.velocity.y -= self.gravity * dt;
        if self.actor.position.y <= GROUND_HEIGHT {
            self.actor.position.y = GROUND_HEIGHT;
            self.actor.velocity.y = 0.0;
        }
        self.actor.position.y += self.actor.velocity.y * dt;
    }

    /// Refresh awareness bookkeeping from the player's position. Chase and
    /// Attack are display states only; the orbit goes on regardless.
    pub fn update_behavior(&mut self, player_pos: Vec3) {
        if self.actor.is_dead {
            return;
        }
        let dist = self.actor.position.distance(player_pos);
        self.behavior = if dist <= self.attack_radius {
            BehaviorState::Attack
        } else if dist <= self.detection_radius {
            BehaviorState::Chase
        } else {
            BehaviorState::Idle
        };
    }
}
