//! Simulation step
//!
//! One call advances the whole world by `dt`: player, enemies, combat,
//! effects, camera, in a fixed order. Nothing here talks to the platform;
//! the frontend owns scheduling, pause and restarts.

use crate::sim::combat;
use crate::sim::effects::{self, VisualEffect};
use crate::sim::input::InputSnapshot;
use crate::sim::state::{GameState, SimPhase};

/// Advance the simulation by one step
pub fn tick(state: &mut GameState, input: &InputSnapshot, dt: f32) {
    if state.phase == SimPhase::GameOver {
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    // Player first; movement is relative to where the camera ended up last
    // step
    let camera_yaw = state.camera.yaw();
    let attacked = state.player.update(input, camera_yaw, &state.field, dt);

    // Enemies walk their orbit, then refresh awareness bookkeeping
    let elapsed = state.elapsed;
    let player_pos = state.player.actor.position;
    for enemy in &mut state.enemies {
        enemy.update(elapsed, dt);
        enemy.update_behavior(player_pos);
    }

    // One swing resolves against every live enemy in range and in the cone
    if attacked {
        state
            .effects
            .push(VisualEffect::sword_sweep(state.player.actor.yaw));
        let hits = combat::resolve_player_attack(&state.player, &mut state.enemies);
        for id in hits {
            state.effects.push(VisualEffect::hit_flash(id));
        }
    }

    // Touching a live enemy bleeds health every step
    let drained = combat::apply_contact_damage(&mut state.player, &state.enemies);
    if drained > 0 {
        state.effects.push(VisualEffect::hurt_flash());
    }

    effects::tick_effects(&mut state.effects, dt);

    // Rigid follow after all movement
    state.camera.follow(state.player.actor.position);

    if state.player.actor.is_dead {
        log::info!(
            "game over at tick {} ({:.1}s)",
            state.time_ticks,
            state.elapsed
        );
        state.phase = SimPhase::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GROUND_HEIGHT, SIM_DT};
    use crate::sim::effects::EffectKind;
    use crate::tuning::Tuning;
    use glam::{Vec2, Vec3};

    const EPSILON: f32 = 1e-4;

    fn small_dungeon() -> Tuning {
        Tuning {
            grid_width: 10,
            grid_height: 10,
            ..Default::default()
        }
    }

    /// Fresh run with every enemy parked at a known spot well away from the
    /// player, so tests control exactly who can touch whom
    fn parked_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, small_dungeon()).unwrap();
        for (i, enemy) in state.enemies.iter_mut().enumerate() {
            enemy.actor.position = Vec3::new(-30.0 - 3.0 * i as f32, GROUND_HEIGHT, -30.0);
        }
        state
    }

    #[test]
    fn test_zero_input_step_is_calm() {
        let mut state = parked_state(123);
        let spawn = state.player.actor.position;
        let enemy_before: Vec<Vec2> = state
            .enemies
            .iter()
            .map(|e| e.actor.planar_position())
            .collect();

        tick(&mut state, &InputSnapshot::default(), SIM_DT);

        // the player holds still and stays grounded
        assert!(state.player.actor.position.distance(spawn) < EPSILON);
        assert!((state.player.actor.position.y - GROUND_HEIGHT).abs() < EPSILON);
        assert_eq!(state.player.actor.health, state.tuning.player_health);
        // enemies do move, but no further than one step allows
        for (enemy, before) in state.enemies.iter().zip(enemy_before.iter()) {
            let walked = enemy.actor.planar_position().distance(*before);
            assert!(walked > 0.0);
            assert!(walked <= enemy.speed * SIM_DT + EPSILON);
            assert_eq!(enemy.actor.health, state.tuning.enemy_health);
        }
        assert_eq!(state.phase, SimPhase::Running);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_attack_resolves_through_tick() {
        let mut state = parked_state(5);
        // one target 1.5 ahead of the player's facing (+Z), in range and cone
        let target = state.player.actor.position + Vec3::new(0.0, 0.0, 1.5);
        state.enemies[0].actor.position = target;
        let attack = InputSnapshot {
            attack: true,
            ..Default::default()
        };

        tick(&mut state, &attack, SIM_DT);
        assert_eq!(
            state.enemies[0].actor.health,
            state.tuning.enemy_health - state.tuning.attack_damage
        );
        // sweep plus one hit flash, and no contact at a 1.5 gap
        assert_eq!(state.effects.len(), 2);
        assert!(
            state
                .effects
                .iter()
                .any(|e| matches!(e.kind, EffectKind::SwordSweep { .. }))
        );
        assert!(
            state
                .effects
                .iter()
                .any(|e| e.kind == EffectKind::HitFlash { enemy_id: 1 })
        );
        assert_eq!(state.player.actor.health, state.tuning.player_health);

        // the cooldown blocks a second swing on the very next step
        tick(&mut state, &attack, SIM_DT);
        assert_eq!(
            state.enemies[0].actor.health,
            state.tuning.enemy_health - state.tuning.attack_damage
        );
    }

    #[test]
    fn test_contact_drains_every_tick() {
        let mut state = parked_state(8);
        state.enemies[0].actor.position = state.player.actor.position;

        tick(&mut state, &InputSnapshot::default(), SIM_DT);
        tick(&mut state, &InputSnapshot::default(), SIM_DT);

        let expected = state.tuning.player_health - 2 * state.tuning.enemy_contact_damage;
        assert_eq!(state.player.actor.health, expected);
        assert!(
            state
                .effects
                .iter()
                .any(|e| e.kind == EffectKind::HurtFlash)
        );
    }

    #[test]
    fn test_contact_kills_and_ends_the_run() {
        let mut state = parked_state(2);
        state.player.actor.health = 7;
        state.enemies[0].actor.position = state.player.actor.position;

        tick(&mut state, &InputSnapshot::default(), SIM_DT);
        assert_eq!(state.player.actor.health, 2);
        assert_eq!(state.phase, SimPhase::Running);

        tick(&mut state, &InputSnapshot::default(), SIM_DT);
        assert!(state.player.actor.is_dead);
        assert_eq!(state.phase, SimPhase::GameOver);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_game_over_freezes_the_world() {
        let mut state = parked_state(2);
        state.player.actor.health = 1;
        state.enemies[0].actor.position = state.player.actor.position;
        tick(&mut state, &InputSnapshot::default(), SIM_DT);
        assert_eq!(state.phase, SimPhase::GameOver);

        let ticks = state.time_ticks;
        let enemy_pos = state.enemies[1].actor.position;
        let busy = InputSnapshot {
            move_dir: Vec2::new(1.0, 1.0),
            attack: true,
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &busy, SIM_DT);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.enemies[1].actor.position, enemy_pos);
    }

    #[test]
    fn test_effects_run_out() {
        let mut state = parked_state(5);
        state.enemies[0].actor.position = state.player.actor.position + Vec3::new(0.0, 0.0, 1.5);
        let attack = InputSnapshot {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &attack, SIM_DT);
        assert!(!state.effects.is_empty());

        // the longest effect lives 0.25 s; 0.4 s of idle clears them all
        for _ in 0..48 {
            tick(&mut state, &InputSnapshot::default(), SIM_DT);
        }
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_camera_follows_the_player() {
        let mut state = parked_state(6);
        let input = InputSnapshot {
            move_dir: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        let expected = state.player.actor.position + state.camera.follow_offset;
        assert!(state.camera.position.distance(expected) < EPSILON);
    }

    #[test]
    fn test_variable_dt_accumulates() {
        let mut state = parked_state(4);
        tick(&mut state, &InputSnapshot::default(), 0.25);
        tick(&mut state, &InputSnapshot::default(), 0.5);
        tick(&mut state, &InputSnapshot::default(), 0.0);
        assert_eq!(state.time_ticks, 3);
        assert!((state.elapsed - 0.75).abs() < EPSILON);
    }
}
