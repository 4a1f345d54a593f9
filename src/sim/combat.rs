//! Combat resolution
//!
//! Melee swings test range plus a forward cone against every live enemy.
//! Contact damage drains the player for every live enemy overlapping them,
//! every step, with no invulnerability window. Dead actors on either side
//! are skipped.

use crate::consts::ATTACK_CONE_DOT;
use crate::sim::enemy::Enemy;
use crate::sim::player::Player;

/// Resolve one melee swing. Every live enemy within attack range whose
/// direction lies inside the forward cone takes the full swing damage.
/// Returns the ids of the enemies hit.
pub fn resolve_player_attack(player: &Player, enemies: &mut [Enemy]) -> Vec<u32> {
    let origin = player.actor.position;
    let forward = player.actor.forward();
    let mut hits = Vec::new();
    for enemy in enemies.iter_mut().filter(|e| !e.actor.is_dead) {
        let offset = enemy.actor.position - origin;
        if offset.length() > player.attack_range {
            continue;
        }
        // an enemy exactly on top of the player has no direction; miss
        let to_enemy = offset.normalize_or_zero();
        if to_enemy.dot(forward) > ATTACK_CONE_DOT {
            if enemy.actor.apply_damage(player.attack_damage) {
                log::debug!("enemy {} slain", enemy.id);
            }
            hits.push(enemy.id);
        }
    }
    hits
}

/// Drain contact damage from the player for every live enemy overlapping
/// them this step. Returns the total drained; zero once the player is dead.
pub fn apply_contact_damage(player: &mut Player, enemies: &[Enemy]) -> i32 {
    let mut total = 0;
    for enemy in enemies.iter().filter(|e| !e.actor.is_dead) {
        if player.actor.is_dead {
            break;
        }
        if enemy.actor.overlaps(&player.actor) {
            player.actor.apply_damage(enemy.damage);
            total += enemy.damage;
        }
    }
    total
}
