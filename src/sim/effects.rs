//! Timed visual effects
//!
//! Effects are plain entities with an elapsed/duration pair, advanced by
//! the loop and dropped once they run out. The renderer reads progress;
//! nothing here schedules callbacks.

use serde::{Deserialize, Serialize};

/// Melee sweep arc lifetime, seconds
pub const SWEEP_DURATION: f32 = 0.25;
/// Struck-enemy flash lifetime
pub const HIT_FLASH_DURATION: f32 = 0.15;
/// Player hurt vignette lifetime
pub const HURT_FLASH_DURATION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Swing arc in front of the player, frozen at the swing's yaw
    SwordSweep { yaw: f32 },
    /// Flash on a struck enemy
    HitFlash { enemy_id: u32 },
    /// Screen-edge flash when the player takes contact damage
    HurtFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub elapsed: f32,
    pub duration: f32,
}

impl VisualEffect {
    pub fn sword_sweep(yaw: f32) -> VisualEffect {
        VisualEffect {
            kind: EffectKind::SwordSweep { yaw },
            elapsed: 0.0,
            duration: SWEEP_DURATION,
        }
    }

    pub fn hit_flash(enemy_id: u32) -> VisualEffect {
        VisualEffect {
            kind: EffectKind::HitFlash { enemy_id },
            elapsed: 0.0,
            duration: HIT_FLASH_DURATION,
        }
    }

    pub fn hurt_flash() -> VisualEffect {
        VisualEffect {
            kind: EffectKind::HurtFlash,
            elapsed: 0.0,
            duration: HURT_FLASH_DURATION,
        }
    }

    /// 0 at spawn, 1 at expiry
    #[inline]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Advance lifetimes and drop expired effects
pub fn tick_effects(effects: &mut Vec<VisualEffect>, dt: f32) {
    for effect in effects.iter_mut() {
        effect.elapsed += dt;
    }
    effects.retain(|e| !e.expired());
}
