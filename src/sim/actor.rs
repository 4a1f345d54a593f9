//! Shared actor state: kinematics, health, death
//!
//! Player and enemies embed the same state block. Death is a one-way
//! transition; dead actors stay in their lists for bookkeeping but are
//! skipped by movement, collision and targeting.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::yaw_to_forward;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading around the Y axis; 0 faces +Z
    pub yaw: f32,
    pub health: i32,
    pub is_dead: bool,
    pub collision_radius: f32,
}

impl ActorState {
    pub fn new(position: Vec3, health: i32, collision_radius: f32) -> ActorState {
        ActorState {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            health,
            is_dead: false,
            collision_radius,
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        yaw_to_forward(self.yaw)
    }

    /// Position projected onto the XZ plane
    #[inline]
    pub fn planar_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Apply damage and return whether this call killed the actor. Dead
    /// actors take no further damage. Health is not floored at zero; the
    /// final hit may leave it negative.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if self.is_dead {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.is_dead = true;
            return true;
        }
        false
    }

    /// Sphere-vs-sphere overlap on summed radii
    #[inline]
    pub fn overlaps(&self, other: &ActorState) -> bool {
        self.position.distance(other.position) < self.collision_radius + other.collision_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_sequence_and_death() {
        let mut actor = ActorState::new(Vec3::new(0.0, 1.0, 0.0), 100, 0.5);
        for expected in [75, 50, 25] {
            assert!(!actor.apply_damage(25));
            assert_eq!(actor.health, expected);
            assert!(!actor.is_dead);
        }
        // fourth hit is lethal
        assert!(actor.apply_damage(25));
        assert_eq!(actor.health, 0);
        assert!(actor.is_dead);
    }

    #[test]
    fn test_damage_after_death_is_noop() {
        let mut actor = ActorState::new(Vec3::ZERO, 10, 0.5);
        assert!(actor.apply_damage(10));
        let health_at_death = actor.health;
        assert!(!actor.apply_damage(50));
        assert_eq!(actor.health, health_at_death);
        assert!(actor.is_dead);
    }

    #[test]
    fn test_overkill_leaves_negative_health() {
        let mut actor = ActorState::new(Vec3::ZERO, 100, 0.5);
        assert!(actor.apply_damage(150));
        assert_eq!(actor.health, -50);
        assert!(actor.is_dead);
    }

    #[test]
    fn test_forward_vector_matches_yaw_convention() {
        let mut actor = ActorState::new(Vec3::ZERO, 100, 0.5);
        actor.yaw = 0.0;
        assert!(actor.forward().distance(Vec3::new(0.0, 0.0, 1.0)) < 1e-6);
        actor.yaw = std::f32::consts::FRAC_PI_2;
        assert!(actor.forward().distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-6);
        // forward(atan2(x, z)) recovers the direction it came from
        let dir = Vec3::new(0.6, 0.0, 0.8);
        actor.yaw = dir.x.atan2(dir.z);
        assert!(actor.forward().distance(dir) < 1e-6);
    }

    #[test]
    fn test_overlap_uses_summed_radii() {
        let a = ActorState::new(Vec3::ZERO, 100, 0.5);
        let mut b = ActorState::new(Vec3::new(1.0, 0.0, 0.0), 100, 0.6);
        assert!(a.overlaps(&b)); // gap 1.0 < 1.1
        b.position.x = 1.2;
        assert!(!a.overlaps(&b)); // gap 1.2 > 1.1
        b.position = Vec3::new(0.0, 1.2, 0.0);
        assert!(!a.overlaps(&b)); // vertical separation counts too
    }
}
