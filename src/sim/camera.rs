//! Camera rig
//!
//! The camera is plain state owned by the game state. The loop writes it
//! after the player moves (rigid follow, no smoothing or obstruction
//! handling) and the player's movement reads its yaw to turn input
//! camera-relative.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Rigid offsets from the follow target
    pub follow_offset: Vec3,
    pub look_ahead: Vec3,
}

impl CameraRig {
    pub fn from_tuning(tuning: &Tuning, target: Vec3) -> CameraRig {
        let mut rig = CameraRig {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            follow_offset: tuning.camera_offset,
            look_ahead: tuning.camera_look_ahead,
        };
        rig.follow(target);
        rig
    }

    /// Rigid follow write, run once per step after the player has moved
    pub fn follow(&mut self, target: Vec3) {
        self.position = target + self.follow_offset;
        self.look_at = target + self.look_ahead;
    }

    /// Horizontal facing of the view direction
    pub fn yaw(&self) -> f32 {
        let dir = self.look_at - self.position;
        dir.x.atan2(dir.z)
    }
}
