//! Per-frame input snapshot
//!
//! The frontend samples held keys and buttons once per frame and hands the
//! sim a plain value. Nothing below the frontend touches the DOM, which
//! keeps every tick replayable from (state, input, dt).

use glam::Vec2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Requested planar movement before camera rotation: x strafes right,
    /// y walks forward. Need not be normalized; the player normalizes.
    pub move_dir: Vec2,
    /// Melee swing held
    pub attack: bool,
    pub jump: bool,
    pub sprint: bool,
    /// Captured for completeness; the prototype has no interaction targets
    pub interact: bool,
}
