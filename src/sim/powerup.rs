//! Power-up state machine
//!
//! Timed effects are entries in the state's `active_effects` list, checked
//! against the simulation clock each step. No wall-clock timers exist
//! anywhere: pausing the game suspends every pending expiry and dropping
//! the state cancels them. Re-collecting an active kind refreshes its
//! expiry instead of stacking a second timer, so overlapping activations
//! can never race to clear a flag early.

use serde::Serialize;

use super::entity::{create_explosion, create_power_up};
use super::events::{GameEvent, SoundCue};
use super::state::{ActiveEffect, DeferredAction, GameState};
use super::types::PowerUpKind;
use crate::consts::MAX_LIVES;

/// HUD-facing view of one active timed effect
#[derive(Debug, Clone, Serialize)]
pub struct HudIndicator {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Absolute simulation time (ms)
    pub expires_at_ms: f64,
}

/// Dispatch a collected pickup
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    state.emit(GameEvent::Sound(SoundCue::PowerUp));

    match kind {
        PowerUpKind::RapidFire
        | PowerUpKind::Shield
        | PowerUpKind::SpreadShot
        | PowerUpKind::SpeedBoost
        | PowerUpKind::Super => {
            // Effect entry first: the shield flag is derived from it
            upsert_effect(state, kind);
            set_flag(state, kind, true);
            state.emit(GameEvent::PowerUpActivated(kind));
        }
        PowerUpKind::Bomb => {
            // Screen clear: every regular enemy dies and pays its base score
            let mut points = 0;
            for i in 0..state.enemies.len() {
                let pos = state.enemies[i].pos;
                let stats = state.enemies[i].stats();
                points += stats.score;
                create_explosion(&mut state.rng, &mut state.particles, pos, stats.color, 20);
            }
            state.enemies.clear();
            if points > 0 {
                state.add_score(points);
            }
            state.emit(GameEvent::PowerUpActivated(kind));
        }
        PowerUpKind::ExtraLife => {
            state.lives = (state.lives + 1).min(MAX_LIVES);
            let lives = state.lives;
            state.emit(GameEvent::LivesChanged(lives));
            state.emit(GameEvent::PowerUpActivated(kind));
        }
    }
}

/// Insert or refresh the timer entry for a timed kind
fn upsert_effect(state: &mut GameState, kind: PowerUpKind) {
    let expires_at_ms = state.clock_ms + kind.duration_ms();
    if let Some(entry) = state.active_effects.iter_mut().find(|e| e.kind == kind) {
        entry.expires_at_ms = expires_at_ms;
    } else {
        state.active_effects.push(ActiveEffect { kind, expires_at_ms });
    }
}

fn set_flag(state: &mut GameState, kind: PowerUpKind, on: bool) {
    match kind {
        PowerUpKind::RapidFire => state.player.rapid_fire = on,
        PowerUpKind::SpreadShot => state.player.spread_shot = on,
        PowerUpKind::SpeedBoost => state.player.speed_boost = on,
        PowerUpKind::Super => state.player.super_mode = on,
        PowerUpKind::Shield => refresh_shield_flag(state),
        PowerUpKind::Bomb | PowerUpKind::ExtraLife => {}
    }
}

/// The shield flag is shared between the Shield power-up and the post-hit
/// invulnerability window. It is recomputed from live state instead of
/// being cleared by whichever timer fires first, so neither source can
/// shorten the other.
pub fn refresh_shield_flag(state: &mut GameState) {
    let shield_power = state.effect_active(PowerUpKind::Shield);
    let invuln = state
        .hit_invuln_until_ms
        .is_some_and(|until| state.clock_ms < until);
    state.player.has_shield = shield_power || invuln;
}

/// Expire timed effects and fire deferred actions whose time has come.
/// Runs once per step against the simulation clock.
pub fn tick_timers(state: &mut GameState) {
    let now = state.clock_ms;

    // Post-hit invulnerability
    if state.hit_invuln_until_ms.is_some_and(|until| now >= until) {
        state.hit_invuln_until_ms = None;
    }

    // Power-up expiries (one entry per kind)
    let expired: Vec<PowerUpKind> = state
        .active_effects
        .iter()
        .filter(|e| now >= e.expires_at_ms)
        .map(|e| e.kind)
        .collect();
    state.active_effects.retain(|e| now < e.expires_at_ms);
    for kind in expired {
        set_flag(state, kind, false);
    }
    refresh_shield_flag(state);

    // Deferred simulation-time actions
    let due: Vec<DeferredAction> = state
        .deferred
        .iter()
        .filter(|d| now >= d.at_ms)
        .map(|d| d.action)
        .collect();
    state.deferred.retain(|d| now < d.at_ms);
    for action in due {
        match action {
            DeferredAction::DropSuper { x, y } => {
                let pickup = create_power_up(&mut state.rng, x, y, Some(PowerUpKind::Super));
                state.power_ups.push(pickup);
            }
            DeferredAction::WaveVolley => super::boss::fire_wave_volley(state),
        }
    }
}

/// HUD indicator list: one entry per distinct active kind
pub fn hud_indicators(state: &GameState) -> Vec<HudIndicator> {
    state
        .active_effects
        .iter()
        .map(|e| HudIndicator {
            name: e.kind.name(),
            icon: e.kind.icon(),
            color: e.kind.color(),
            expires_at_ms: e.expires_at_ms,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::{push_enemy, test_state};
    use crate::sim::types::EnemyKind;
    use glam::Vec2;

    #[test]
    fn test_shield_sets_flag_for_full_duration() {
        let mut state = test_state();
        apply_power_up(&mut state, PowerUpKind::Shield);
        assert!(state.player.has_shield);

        // One tick short of the duration: still shielded
        state.clock_ms = PowerUpKind::Shield.duration_ms() - 1.0;
        tick_timers(&mut state);
        assert!(state.player.has_shield);

        state.clock_ms = PowerUpKind::Shield.duration_ms();
        tick_timers(&mut state);
        assert!(!state.player.has_shield);
        assert!(state.active_effects.is_empty());
    }

    #[test]
    fn test_recollect_refreshes_instead_of_stacking() {
        let mut state = test_state();
        apply_power_up(&mut state, PowerUpKind::RapidFire);
        state.clock_ms = 5000.0;
        apply_power_up(&mut state, PowerUpKind::RapidFire);

        assert_eq!(state.active_effects.len(), 1);
        let entry = state.active_effects[0];
        assert_eq!(entry.expires_at_ms, 5000.0 + PowerUpKind::RapidFire.duration_ms());

        // The first activation's original deadline passes without effect
        state.clock_ms = PowerUpKind::RapidFire.duration_ms() + 1.0;
        tick_timers(&mut state);
        assert!(state.player.rapid_fire);
    }

    #[test]
    fn test_hit_invuln_shield_reverts_after_window() {
        let mut state = test_state();
        state.clock_ms = 1000.0;
        state.hit_invuln_until_ms = Some(1000.0 + crate::consts::INVULN_DURATION_MS);
        refresh_shield_flag(&mut state);
        assert!(state.player.has_shield);

        state.clock_ms = 2999.0;
        tick_timers(&mut state);
        assert!(state.player.has_shield);

        state.clock_ms = 3000.0;
        tick_timers(&mut state);
        assert!(!state.player.has_shield);
    }

    #[test]
    fn test_hit_invuln_does_not_cut_shield_power_up_short() {
        let mut state = test_state();
        apply_power_up(&mut state, PowerUpKind::Shield);
        // Invulnerability granted and expired while the power-up still runs
        state.hit_invuln_until_ms = Some(1000.0);
        state.clock_ms = 1500.0;
        tick_timers(&mut state);
        assert!(state.player.has_shield);
        assert_eq!(state.hit_invuln_until_ms, None);
    }

    #[test]
    fn test_bomb_clears_enemies_and_pays_base_scores() {
        let mut state = test_state();
        push_enemy(&mut state, EnemyKind::Normal, Vec2::new(100.0, 100.0));
        push_enemy(&mut state, EnemyKind::Tank, Vec2::new(200.0, 100.0));

        apply_power_up(&mut state, PowerUpKind::Bomb);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 10 + 30);
    }

    #[test]
    fn test_extra_life_caps_at_max() {
        let mut state = test_state();
        state.lives = MAX_LIVES;
        apply_power_up(&mut state, PowerUpKind::ExtraLife);
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_hud_indicators_one_per_kind() {
        let mut state = test_state();
        apply_power_up(&mut state, PowerUpKind::Shield);
        apply_power_up(&mut state, PowerUpKind::SpeedBoost);
        apply_power_up(&mut state, PowerUpKind::Shield);

        let hud = hud_indicators(&state);
        assert_eq!(hud.len(), 2);
        assert!(hud.iter().any(|i| i.name == "Shield"));
    }
}
