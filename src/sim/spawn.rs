//! Spawn scheduling: the per-frame enemy roll and the 60-second boss timer.

use rand::Rng;

use super::entity::{create_boss, create_enemy, create_explosion};
use super::events::GameEvent;
use super::state::GameState;
use crate::consts::{BOSS_TIMER_MS, BOSS_WARNING_MS, SPAWN_CHANCE_BASE, SPAWN_CHANCE_PER_LEVEL};

/// Roll for a new enemy. The spawn chance is expressed per 60 fps frame
/// and scaled by `dt_ms`, so spawn density is frame-rate independent.
/// Nothing spawns while a boss holds the field.
pub fn spawn_enemies(state: &mut GameState, dt_ms: f64) {
    if state.boss.is_some() {
        return;
    }
    if state.enemies.len() >= state.enemy_cap() {
        return;
    }
    let per_frame = SPAWN_CHANCE_BASE + state.level as f32 * SPAWN_CHANCE_PER_LEVEL;
    let chance = per_frame * (dt_ms * 60.0 / 1000.0) as f32;
    if state.rng.random::<f32>() < chance {
        let enemy = create_enemy(&mut state.rng, state.width, state.level);
        state.enemies.push(enemy);
    }
}

/// Advance the boss timer. It only accumulates while no boss is active,
/// flips the warning flag for the final ten seconds, and at 60 000 ms
/// clears the field and brings in the stage boss.
pub fn tick_boss_timer(state: &mut GameState, dt_ms: f64) {
    if state.boss.is_some() {
        return;
    }
    state.boss_timer_ms += dt_ms;

    let remaining = BOSS_TIMER_MS - state.boss_timer_ms;
    let warn = remaining <= BOSS_WARNING_MS && remaining > 0.0;
    if warn != state.boss_warning {
        state.boss_warning = warn;
        state.emit(GameEvent::BossWarning(warn));
    }

    if state.boss_timer_ms >= BOSS_TIMER_MS {
        state.boss_timer_ms = 0.0;
        state.boss_warning = false;
        spawn_boss(state);
    }
}

fn spawn_boss(state: &mut GameState) {
    let stage = state.stage_number();
    let defeat_count = state.defeat_counts.get(&stage).copied().unwrap_or(0);

    // The field is cleared for the duel; no score for these
    for i in 0..state.enemies.len() {
        let pos = state.enemies[i].pos;
        let color = state.enemies[i].stats().color;
        create_explosion(&mut state.rng, &mut state.particles, pos, color, 10);
    }
    state.enemies.clear();

    let boss = create_boss(state.width, stage, defeat_count);
    log::info!("boss stage {stage} spawning (appearance {})", defeat_count + 1);
    state.boss = Some(boss);
    state.emit(GameEvent::BossSpawned { stage });
}
