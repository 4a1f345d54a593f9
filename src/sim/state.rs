//! Game state
//!
//! Everything the simulation owns, built from a seed plus tuning and
//! advanced only by `tick`. Two states with the same seed and tuning evolve
//! identically under the same inputs.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_HEIGHT;
use crate::sim::camera::CameraRig;
use crate::sim::collision::CollisionField;
use crate::sim::effects::VisualEffect;
use crate::sim::enemy::Enemy;
use crate::sim::grid::{DungeonGrid, GridError};
use crate::sim::player::Player;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Normal play
    Running,
    /// Player is dead; ticks are no-ops until a restart builds a new state
    GameOver,
}

/// Values the HUD shows after each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudStatus {
    pub health: i32,
    pub level: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance values this run was built with
    pub tuning: Tuning,
    /// Current phase
    pub phase: SimPhase,
    /// Generated dungeon layout
    pub grid: DungeonGrid,
    /// Wall rects derived from the grid
    pub field: CollisionField,
    /// The player
    pub player: Player,
    /// All enemies, dead ones included
    pub enemies: Vec<Enemy>,
    /// Follow camera, written by the tick after the player moves
    pub camera: CameraRig,
    /// Live timed effects (not gameplay-affecting)
    pub effects: Vec<VisualEffect>,
    /// Dungeon depth shown on the HUD; the prototype never descends
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation seconds accumulated across ticks; drives the orbit clock
    pub elapsed: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build a fresh run: generate the layout, derive the collision field,
    /// put the player on the guaranteed-open grid center, and batch-spawn
    /// enemies at random interior positions nudged out of any wall they
    /// land in.
    pub fn new(seed: u64, tuning: Tuning) -> Result<GameState, GridError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = DungeonGrid::generate(tuning.grid_width, tuning.grid_height, &mut rng)?;
        let field = CollisionField::from_grid(&grid, tuning.tile_size);
        log::info!(
            "dungeon {}x{} generated, {} wall cells (seed {})",
            grid.width(),
            grid.height(),
            grid.wall_count(),
            seed
        );

        let (center_row, center_col) = grid.center_cell();
        let spawn = Vec3::new(
            center_col as f32 * tuning.tile_size,
            GROUND_HEIGHT,
            center_row as f32 * tuning.tile_size,
        );
        let player = Player::from_tuning(&tuning, spawn);
        let camera = CameraRig::from_tuning(&tuning, spawn);

        let mut state = GameState {
            seed,
            tuning,
            phase: SimPhase::Running,
            grid,
            field,
            player,
            enemies: Vec::new(),
            camera,
            effects: Vec::new(),
            level: 1,
            time_ticks: 0,
            elapsed: 0.0,
            next_id: 1,
        };
        state.spawn_enemies(&mut rng);
        Ok(state)
    }

    /// Batch-spawn the run's enemies across the dungeon interior
    fn spawn_enemies(&mut self, rng: &mut impl Rng) {
        let tile = self.tuning.tile_size;
        let min_x = tile;
        let max_x = (self.grid.width() - 2) as f32 * tile;
        let min_z = tile;
        let max_z = (self.grid.height() - 2) as f32 * tile;
        for _ in 0..self.tuning.enemy_count {
            let id = self.next_entity_id();
            let draw = Vec2::new(
                rng.random_range(min_x..=max_x),
                rng.random_range(min_z..=max_z),
            );
            let placed = self
                .field
                .resolve_valid_position(draw, self.tuning.enemy_radius);
            if placed != draw {
                log::debug!("enemy {} relocated out of a wall at spawn", id);
            }
            let position = Vec3::new(placed.x, GROUND_HEIGHT, placed.y);
            self.enemies
                .push(Enemy::from_tuning(&self.tuning, id, position));
        }
        log::info!("spawned {} enemies", self.enemies.len());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn hud(&self) -> HudStatus {
        HudStatus {
            health: self.player.actor.health,
            level: self.level,
        }
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| !e.actor.is_dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_shape() {
        let state = GameState::new(7, Tuning::default()).unwrap();
        assert_eq!(state.phase, SimPhase::Running);
        assert_eq!(state.level, 1);
        assert_eq!(state.time_ticks, 0);
        assert!(state.effects.is_empty());
        assert_eq!(state.enemies.len(), state.tuning.enemy_count);
        let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_player_spawns_on_open_center() {
        let state = GameState::new(11, Tuning::default()).unwrap();
        let (center_row, center_col) = state.grid.center_cell();
        let expected = Vec3::new(
            center_col as f32 * state.tuning.tile_size,
            GROUND_HEIGHT,
            center_row as f32 * state.tuning.tile_size,
        );
        assert_eq!(state.player.actor.position, expected);
        // the spawn cell is floor, so the player starts clear of walls
        assert!(!state.field.overlaps_wall(
            state.player.actor.planar_position(),
            state.player.actor.collision_radius
        ));
    }

    #[test]
    fn test_enemies_spawn_inside_interior_band() {
        let state = GameState::new(3, Tuning::default()).unwrap();
        let tile = state.tuning.tile_size;
        let max_x = (state.grid.width() - 2) as f32 * tile;
        let max_z = (state.grid.height() - 2) as f32 * tile;
        // relocation nudges at most 2 * radius off the draw
        let slack = 2.0 * state.tuning.enemy_radius + 1e-4;
        for enemy in &state.enemies {
            let p = enemy.actor.planar_position();
            assert!(p.x >= tile - slack && p.x <= max_x + slack);
            assert!(p.y >= tile - slack && p.y <= max_z + slack);
            assert_eq!(enemy.actor.position.y, GROUND_HEIGHT);
            assert!(!enemy.actor.is_dead);
        }
    }

    #[test]
    fn test_same_seed_builds_identical_runs() {
        let a = GameState::new(42, Tuning::default()).unwrap();
        let b = GameState::new(42, Tuning::default()).unwrap();
        assert_eq!(a.grid.wall_count(), b.grid.wall_count());
        for (ea, eb) in a.enemies.iter().zip(b.enemies.iter()) {
            assert_eq!(ea.actor.position, eb.actor.position);
        }
        assert_eq!(a.player.actor.position, b.player.actor.position);
    }

    #[test]
    fn test_degenerate_dimensions_propagate() {
        let tuning = Tuning {
            grid_width: 2,
            ..Default::default()
        };
        assert_eq!(
            GameState::new(1, tuning).unwrap_err(),
            GridError::DimensionsTooSmall {
                width: 2,
                height: 20
            }
        );
    }

    #[test]
    fn test_hud_reflects_player_health() {
        let mut state = GameState::new(5, Tuning::default()).unwrap();
        assert_eq!(
            state.hud(),
            HudStatus {
                health: 100,
                level: 1
            }
        );
        state.player.actor.apply_damage(30);
        assert_eq!(state.hud().health, 70);
    }

    #[test]
    fn test_entity_ids_are_unique_and_monotonic() {
        let mut state = GameState::new(9, Tuning::default()).unwrap();
        let next = state.next_entity_id();
        assert_eq!(next as usize, state.tuning.enemy_count + 1);
        assert_eq!(state.next_entity_id(), next + 1);
    }
}
