//! Data-driven game balance
//!
//! Every gameplay number that is balance rather than structure lives here,
//! so a run is reproducible from its seed plus its tuning. Persisted in
//! LocalStorage separately from any game state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Dungeon layout ===
    /// Grid dimensions in cells; generation rejects anything under 3x3
    pub grid_width: usize,
    pub grid_height: usize,
    /// World-units edge length of one cell
    pub tile_size: f32,

    // === Player ===
    pub player_health: i32,
    pub player_radius: f32,
    /// Walk speed, world units per second
    pub player_speed: f32,
    pub sprint_multiplier: f32,
    /// Yaw blend rate; the per-step factor is min(rate * dt, 1)
    pub rotation_smoothing: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Seconds between melee swings
    pub attack_rate: f32,
    pub attack_damage: i32,
    pub attack_range: f32,

    // === Enemies ===
    pub enemy_count: usize,
    pub enemy_health: i32,
    pub enemy_radius: f32,
    pub enemy_speed: f32,
    /// Health drained from the player per step of contact
    pub enemy_contact_damage: i32,
    /// Awareness bookkeeping only; does not change motion
    pub enemy_detection_radius: f32,
    pub enemy_attack_radius: f32,
    /// Orbit circle the enemies patrol, centered at the world origin
    pub orbit_radius: f32,
    pub orbit_angular_speed: f32,

    // === Camera ===
    /// Rigid follow offset from the player
    pub camera_offset: Vec3,
    /// Where the camera aims, relative to the player
    pub camera_look_ahead: Vec3,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Dungeon
            grid_width: 20,
            grid_height: 20,
            tile_size: 2.0,

            // Player
            player_health: 100,
            player_radius: 0.5,
            player_speed: 6.0,
            sprint_multiplier: 1.6,
            rotation_smoothing: 10.0,
            jump_force: 8.0,
            gravity: 20.0,
            attack_rate: 0.5,
            attack_damage: 25,
            attack_range: 2.0,

            // Enemies
            enemy_count: 5,
            enemy_health: 100,
            enemy_radius: 0.6,
            enemy_speed: 2.0,
            enemy_contact_damage: 5,
            enemy_detection_radius: 8.0,
            enemy_attack_radius: 1.5,
            orbit_radius: 5.0,
            orbit_angular_speed: 0.5,

            // Camera
            camera_offset: Vec3::new(0.0, 8.0, -10.0),
            camera_look_ahead: Vec3::new(0.0, 1.0, 2.0),
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "gloomcrawl_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tuning) = serde_json::from_str(&json) {
                    log::info!("Loaded tuning from LocalStorage");
                    return tuning;
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_json() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tuning);
    }

    #[test]
    fn test_defaults_are_sane() {
        let t = Tuning::default();
        assert!(t.grid_width >= 3 && t.grid_height >= 3);
        assert!(t.tile_size > 0.0);
        assert!(t.attack_range > t.player_radius);
        assert!(t.enemy_detection_radius > t.enemy_attack_radius);
    }
}
