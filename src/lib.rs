//! Gloomcrawl - A browser-based 3D dungeon crawler prototype
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, collision, actors, combat)
//! - `renderer`: WebGPU raymarch rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth movement)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Resting height of every actor's origin above the floor
    pub const GROUND_HEIGHT: f32 = 1.0;

    /// Distance increment for `resolve_valid_position` probes
    pub const PROBE_STEP: f32 = 0.1;

    /// Forward cone for melee hits: dot(player forward, to-enemy) must
    /// exceed this (roughly a 120 degree cone)
    pub const ATTACK_CONE_DOT: f32 = 0.5;
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit forward vector for a yaw angle. Yaw 0 faces +Z, matching
/// `atan2(x, z)` used everywhere an angle is derived from a direction.
#[inline]
pub fn yaw_to_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Rotate a planar (x, z) vector by a yaw angle, so that (0, 1) maps onto
/// `yaw_to_forward(yaw)`
#[inline]
pub fn rotate_by_yaw(dir: Vec2, yaw: f32) -> Vec2 {
    let (s, c) = yaw.sin_cos();
    Vec2::new(dir.x * c + dir.y * s, -dir.x * s + dir.y * c)
}
