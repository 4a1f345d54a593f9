//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through the `dt` passed to `tick`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod actor;
pub mod camera;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod enemy;
pub mod grid;
pub mod input;
pub mod player;
pub mod state;
pub mod tick;

pub use actor::ActorState;
pub use camera::CameraRig;
pub use collision::{CollisionField, WallRect};
pub use combat::{apply_contact_damage, resolve_player_attack};
pub use effects::{EffectKind, VisualEffect};
pub use enemy::{BehaviorState, Enemy};
pub use grid::{Cell, DungeonGrid, GridError};
pub use input::InputSnapshot;
pub use player::Player;
pub use state::{GameState, HudStatus, SimPhase};
pub use tick::tick;
