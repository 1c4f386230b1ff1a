//! Collision detection and response
//!
//! Everything is a circle: collisions are Euclidean center-distance tests
//! against a per-pair threshold. Bullet-vs-enemy resolution iterates
//! enemies in insertion order and consumes each bullet on its first match;
//! that array-order tie-break is deliberate and load-bearing for replay
//! parity, so keep it when touching this code.

use glam::Vec2;
use rand::Rng;

use super::entity::{create_dissolve_effect, create_explosion, create_power_up};
use super::events::{GameEvent, SoundCue};
use super::powerup::refresh_shield_flag;
use super::state::{GamePhase, GameState};
use super::types::{EnemyKind, PowerUpKind};
use crate::consts::*;

/// Circle-circle test: two centers collide iff their distance is below the
/// threshold (sum of effective radii, chosen per pair).
#[inline]
pub fn circles_hit(a: Vec2, b: Vec2, threshold: f32) -> bool {
    a.distance_squared(b) < threshold * threshold
}

/// Player bullets vs. regular enemies.
///
/// Each bullet is consumed by at most one collision per frame: it is marked
/// inactive on its first hit and skipped for every later enemy. Dead
/// enemies award `score * level` exactly once, roll for a power-up drop,
/// and are removed before the function returns.
pub fn resolve_bullets_vs_enemies(state: &mut GameState) {
    for enemy_idx in 0..state.enemies.len() {
        if state.enemies[enemy_idx].hp <= 0 {
            continue;
        }
        let enemy_pos = state.enemies[enemy_idx].pos;
        let enemy_size = state.enemies[enemy_idx].stats().size;

        for bullet_idx in 0..state.bullets.len() {
            if !state.bullets[bullet_idx].active {
                continue;
            }
            if !circles_hit(state.bullets[bullet_idx].pos, enemy_pos, enemy_size) {
                continue;
            }

            let bullet_pos = state.bullets[bullet_idx].pos;
            let damage = state.bullets[bullet_idx].damage;
            state.bullets[bullet_idx].active = false;
            state.emit(GameEvent::Sound(SoundCue::EnemyHit));

            let enemy = &mut state.enemies[enemy_idx];
            enemy.hp -= damage;
            enemy.dissolve += enemy.stats().dissolve_rate;

            let enemy_snapshot = state.enemies[enemy_idx].clone();
            create_dissolve_effect(&mut state.rng, &mut state.particles, &enemy_snapshot);
            create_explosion(&mut state.rng, &mut state.particles, bullet_pos, "#FFFFFF", 3);

            if state.enemies[enemy_idx].hp <= 0 {
                on_enemy_killed(state, enemy_idx);
                break; // remaining bullets check the next enemy
            }
        }
    }

    // hp <= 0 is the sole removal predicate
    state.enemies.retain(|e| e.hp > 0);
    state.bullets.retain(|b| b.active);
}

/// Death effects, score, and the power-up drop roll for one enemy
fn on_enemy_killed(state: &mut GameState, enemy_idx: usize) {
    let pos = state.enemies[enemy_idx].pos;
    let kind = state.enemies[enemy_idx].kind;
    let stats = state.enemies[enemy_idx].stats();

    create_explosion(&mut state.rng, &mut state.particles, pos, stats.color, 30);
    state.emit(GameEvent::Sound(SoundCue::EnemyDestroy));
    state.add_score(stats.score * state.level as u64);

    if state.rng.random::<f32>() < stats.drop_chance {
        // Stronger enemies bias toward the big-ticket drops
        let forced = match kind {
            EnemyKind::Tank if state.rng.random::<f32>() < 0.3 => Some(PowerUpKind::Super),
            EnemyKind::Ghost if state.rng.random::<f32>() < 0.4 => Some(PowerUpKind::ExtraLife),
            _ => None,
        };
        let pickup = create_power_up(&mut state.rng, pos.x, pos.y, forced);
        state.power_ups.push(pickup);
    }
}

/// Enemy bullets vs. the player. Shield and super mode ignore hits.
pub fn resolve_enemy_bullets_vs_player(state: &mut GameState) {
    if state.player.has_shield || state.player.super_mode {
        return;
    }
    let player_pos = state.player.pos;
    let player_radius = state.player.width / 2.0;

    let mut hit = false;
    state.enemy_bullets.retain(|bullet| {
        if hit {
            return true;
        }
        if circles_hit(bullet.pos, player_pos, player_radius + bullet.size) {
            hit = true;
            return false;
        }
        true
    });

    if hit {
        damage_player(state);
    }
}

/// Ramming enemies vs. the player. A ram zeroes the enemy's hp (no score);
/// the corpse is culled by the end-of-step retain.
pub fn resolve_enemies_vs_player(state: &mut GameState) {
    if state.player.has_shield || state.player.super_mode {
        return;
    }
    let player_pos = state.player.pos;
    let player_radius = state.player.width / 3.0;

    let mut rammed = false;
    for enemy in &mut state.enemies {
        if circles_hit(enemy.pos, player_pos, enemy.stats().size + player_radius) {
            enemy.hp = 0;
            rammed = true;
        }
    }

    if rammed {
        damage_player(state);
    }
}

/// One life loss plus the 2-second invulnerability window that prevents a
/// single overlap from draining several lives across consecutive frames.
pub fn damage_player(state: &mut GameState) {
    let pos = state.player.pos;
    create_explosion(&mut state.rng, &mut state.particles, pos, "#FF0000", 30);

    state.hit_invuln_until_ms = Some(state.clock_ms + INVULN_DURATION_MS);
    refresh_shield_flag(state);

    state.lives = state.lives.saturating_sub(1);
    let lives = state.lives;
    state.emit(GameEvent::LivesChanged(lives));

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        let score = state.score;
        let stage = state.stage_number();
        state.emit(GameEvent::GameOver { score, stage });
        state.emit(GameEvent::Sound(SoundCue::GameOver));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bullet;
    use crate::sim::test_support::{push_enemy, test_state};

    #[test]
    fn test_circles_hit_threshold() {
        assert!(circles_hit(Vec2::ZERO, Vec2::new(14.0, 0.0), 15.0));
        assert!(!circles_hit(Vec2::ZERO, Vec2::new(15.0, 0.0), 15.0));
        assert!(!circles_hit(Vec2::ZERO, Vec2::new(20.0, 0.0), 15.0));
    }

    #[test]
    fn test_bullet_kill_awards_score_once_and_removes_enemy() {
        let mut state = test_state();
        state.level = 1;
        push_enemy(&mut state, EnemyKind::Normal, Vec2::new(400.0, 300.0));
        state.bullets.push(Bullet {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
            size: 5.0,
            color: "#00FFFF",
            damage: 1,
            active: true,
        });

        resolve_bullets_vs_enemies(&mut state);

        // Normal: hp=1, score=10, level 1 => exactly +10
        assert_eq!(state.score, 10);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        let scores: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged(_)))
            .collect();
        assert_eq!(scores, vec![GameEvent::ScoreChanged(10)]);
    }

    #[test]
    fn test_bullet_consumed_by_at_most_one_enemy() {
        let mut state = test_state();
        // Two overlapping tanks; one damage-1 bullet
        push_enemy(&mut state, EnemyKind::Tank, Vec2::new(400.0, 300.0));
        push_enemy(&mut state, EnemyKind::Tank, Vec2::new(405.0, 300.0));
        state.bullets.push(Bullet {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
            size: 5.0,
            color: "#00FFFF",
            damage: 1,
            active: true,
        });

        resolve_bullets_vs_enemies(&mut state);

        // First enemy in the array takes the hit; the second is untouched
        assert_eq!(state.enemies[0].hp, state.enemies[0].max_hp - 1);
        assert_eq!(state.enemies[1].hp, state.enemies[1].max_hp);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_damage_taken_accumulates_dissolve() {
        let mut state = test_state();
        push_enemy(&mut state, EnemyKind::Tank, Vec2::new(400.0, 300.0));
        state.bullets.push(Bullet {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
            size: 5.0,
            color: "#00FFFF",
            damage: 1,
            active: true,
        });

        resolve_bullets_vs_enemies(&mut state);
        let expected = EnemyKind::Tank.stats().dissolve_rate;
        assert!((state.enemies[0].dissolve - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_player_hit_loses_one_life_and_gains_invuln() {
        let mut state = test_state();
        state.clock_ms = 1000.0;
        let player_pos = state.player.pos;
        push_enemy(&mut state, EnemyKind::Normal, player_pos);

        resolve_enemies_vs_player(&mut state);

        assert_eq!(state.lives, 2);
        assert!(state.player.has_shield);
        assert_eq!(state.hit_invuln_until_ms, Some(1000.0 + INVULN_DURATION_MS));
        // Rammed enemy dies without score
        assert_eq!(state.enemies[0].hp, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_shielded_player_ignores_enemy_bullets() {
        let mut state = test_state();
        state.player.has_shield = true;
        state.enemy_bullets.push(crate::sim::state::EnemyBullet {
            pos: state.player.pos,
            vel: Vec2::ZERO,
            size: 6.0,
            color: "#FF1493",
            damage: 1,
            homing: false,
        });

        resolve_enemy_bullets_vs_player(&mut state);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.enemy_bullets.len(), 1);
    }

    #[test]
    fn test_last_life_triggers_game_over() {
        let mut state = test_state();
        state.lives = 1;
        state.score = 1234;
        damage_player(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 1234, stage: 1 }));
    }
}
