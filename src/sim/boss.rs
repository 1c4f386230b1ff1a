//! Boss behavior: entrance, idle hover, attack patterns, the two-phase
//! defeat (escape on the first kill, permanent death on the second) and
//! bullet collision.

use glam::Vec2;
use rand::Rng;

use super::entity::create_explosion;
use super::events::{GameEvent, SoundCue};
use super::state::{Boss, Deferred, DeferredAction, EnemyBullet, GameState};
use super::types::{AttackPattern, RAINBOW_COLORS};
use crate::consts::{BOSS_ENTER_SPEED, BOSS_ESCAPE_SPEED};

/// Advance the boss by `dt_ms`. No-op when no boss is active.
///
/// The boss is taken out of the state for the duration of the update so
/// the rest of the state stays freely borrowable; it is put back unless
/// it finished its escape flight.
pub fn update_boss(state: &mut GameState, dt_ms: f64) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };
    let dt = (dt_ms / 1000.0) as f32;

    boss.time_ms += dt_ms;
    boss.attack_angle += 3.0 * dt;

    if boss.escaping {
        if update_escape(state, &mut boss, dt) {
            // Flew off screen; the first defeat is now on the books
            let stage = boss.stage_number;
            *state.defeat_counts.entry(stage).or_insert(0) += 1;
            state.emit(GameEvent::BossEscaped { stage });
            log::info!("boss stage {stage} escaped");
            return;
        }
        state.boss = Some(boss);
        return;
    }

    if boss.entering {
        boss.pos.y += BOSS_ENTER_SPEED * dt;
        if boss.pos.y >= boss.target_y {
            boss.pos.y = boss.target_y;
            boss.entering = false;
        }
    } else {
        // Idle hover around the top center
        boss.pos.y = boss.target_y + (boss.time_ms * 0.002).sin() as f32 * 10.0;
        boss.pos.x = state.width / 2.0 + (boss.time_ms * 0.001).cos() as f32 * 20.0;
    }

    let design = boss.design();
    if state.clock_ms - boss.last_attack_ms > design.attack_interval_ms {
        boss.last_attack_ms = state.clock_ms;
        dispatch_attack(state, &boss, design.attack_pattern);
    }

    state.boss = Some(boss);
}

/// Straight-line flight toward the player's position at the moment the
/// escape started. Returns true once the boss has left the screen; the
/// defeat counter is only bumped then, so the flight itself is the reprieve.
fn update_escape(state: &mut GameState, boss: &mut Boss, dt: f32) -> bool {
    let dir = *boss
        .escape_dir
        .get_or_insert_with(|| (state.player.pos - boss.pos).normalize_or(Vec2::Y));
    boss.pos += dir * BOSS_ESCAPE_SPEED * dt;

    boss.pos.y > state.height + 200.0 || boss.pos.x < -200.0 || boss.pos.x > state.width + 200.0
}

fn dispatch_attack(state: &mut GameState, boss: &Boss, pattern: AttackPattern) {
    match pattern {
        AttackPattern::Spiral => fire_spiral(state, boss),
        AttackPattern::Spread => fire_spread(state, boss),
        AttackPattern::Homing => fire_homing(state, boss),
        AttackPattern::Radial => fire_radial(state, boss),
        AttackPattern::Wave => {
            fire_volley(state, boss);
            // Two more volleys, 200 ms apart on the simulation clock
            for i in 1..3 {
                state.deferred.push(Deferred {
                    at_ms: state.clock_ms + i as f64 * 200.0,
                    action: DeferredAction::WaveVolley,
                });
            }
        }
        AttackPattern::Chaos => fire_chaos(state, boss),
        AttackPattern::Laser => fire_laser(state, boss),
        AttackPattern::Rainbow => fire_rainbow(state, boss),
    }
}

fn fire_spiral(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    let muzzle = boss.pos + Vec2::new(0.0, design.size * 0.5);
    for i in 0..8 {
        let angle = boss.attack_angle + (std::f32::consts::TAU / 8.0) * i as f32;
        state.enemy_bullets.push(EnemyBullet {
            pos: muzzle,
            vel: Vec2::from_angle(angle) * 240.0,
            size: 8.0,
            color: design.bullet_color,
            damage: 2,
            homing: false,
        });
    }
}

fn fire_spread(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    let muzzle = boss.pos + Vec2::new(0.0, design.size * 0.5);
    for i in -3..=3 {
        state.enemy_bullets.push(EnemyBullet {
            pos: muzzle,
            vel: Vec2::new(i as f32 * 90.0, 300.0),
            size: 7.0,
            color: design.bullet_color,
            damage: 1,
            homing: false,
        });
    }
}

fn fire_homing(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    // Aimed once at fire time; the bullets fly straight afterwards
    let dir = (state.player.pos - boss.pos).normalize_or(Vec2::Y);
    for i in 0..3 {
        state.enemy_bullets.push(EnemyBullet {
            pos: boss.pos + Vec2::new((i as f32 - 1.0) * 30.0, design.size * 0.5),
            vel: dir * 180.0,
            size: 10.0,
            color: design.bullet_color,
            damage: 2,
            homing: true,
        });
    }
}

fn fire_radial(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    for i in 0..16 {
        let angle = (std::f32::consts::TAU / 16.0) * i as f32 + boss.attack_angle;
        state.enemy_bullets.push(EnemyBullet {
            pos: boss.pos,
            vel: Vec2::from_angle(angle) * 300.0,
            size: 6.0,
            color: design.bullet_color,
            damage: 1,
            homing: false,
        });
    }
}

/// One nine-bullet weaving row of the Wave pattern
fn fire_volley(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    for i in -4..=4 {
        state.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(boss.pos.x + i as f32 * 15.0, boss.pos.y + design.size * 0.5),
            vel: Vec2::new((boss.attack_angle + i as f32 * 0.3).sin() * 180.0, 240.0),
            size: 6.0,
            color: design.bullet_color,
            damage: 1,
            homing: false,
        });
    }
}

/// Deferred Wave volley. Reads the boss's phase angle at fire time, and is
/// skipped silently if the boss died or fled in the meantime.
pub fn fire_wave_volley(state: &mut GameState) {
    let Some(boss) = state.boss.take() else {
        return;
    };
    if !boss.escaping {
        fire_volley(state, &boss);
    }
    state.boss = Some(boss);
}

fn fire_chaos(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    for _ in 0..12 {
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let speed = 180.0 + state.rng.random::<f32>() * 240.0;
        state.enemy_bullets.push(EnemyBullet {
            pos: boss.pos,
            vel: Vec2::from_angle(angle) * speed,
            size: 7.0,
            color: design.bullet_color,
            damage: 1,
            homing: false,
        });
    }
}

fn fire_laser(state: &mut GameState, boss: &Boss) {
    let design = boss.design();
    let muzzle = boss.pos + Vec2::new(0.0, design.size * 0.5);
    for _ in 0..20 {
        let jitter_x = (state.rng.random::<f32>() - 0.5) * 20.0;
        let vx = (state.rng.random::<f32>() - 0.5) * 120.0;
        state.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(muzzle.x + jitter_x, muzzle.y),
            vel: Vec2::new(vx, 600.0),
            size: 4.0,
            color: design.bullet_color,
            damage: 1,
            homing: false,
        });
    }
}

fn fire_rainbow(state: &mut GameState, boss: &Boss) {
    for i in 0..14 {
        let angle = (std::f32::consts::TAU / 14.0) * i as f32;
        state.enemy_bullets.push(EnemyBullet {
            pos: boss.pos,
            vel: Vec2::from_angle(angle) * 240.0,
            size: 7.0,
            color: RAINBOW_COLORS[i % RAINBOW_COLORS.len()],
            damage: 1,
            homing: false,
        });
    }
}

/// Player bullets against the boss body. An escaping boss is untouchable.
pub fn resolve_bullets_vs_boss(state: &mut GameState) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };
    if boss.escaping {
        state.boss = Some(boss);
        return;
    }
    let radius = boss.design().size;

    let mut killed = false;
    for bullet in state.bullets.iter_mut() {
        if !bullet.active {
            continue;
        }
        if !super::collision::circles_hit(bullet.pos, boss.pos, radius) {
            continue;
        }
        bullet.active = false;
        boss.hp -= bullet.damage;
        create_explosion(&mut state.rng, &mut state.particles, bullet.pos, "#FFFFFF", 5);
        if boss.hp <= 0 {
            killed = true;
            break;
        }
    }
    state.bullets.retain(|b| b.active);

    if killed {
        on_boss_killed(state, boss);
    } else {
        state.boss = Some(boss);
    }
}

/// First kill starts the escape; the second (same stage, later appearance)
/// is permanent. The stage score is paid either way.
fn on_boss_killed(state: &mut GameState, mut boss: Boss) {
    let design = boss.design();
    let stage = boss.stage_number;

    state.add_score(design.score);

    if boss.second_appearance {
        create_explosion(&mut state.rng, &mut state.particles, boss.pos, design.color, 100);
        state.emit(GameEvent::Sound(SoundCue::BossDead));
        for i in 0..3 {
            let x = boss.pos.x + (state.rng.random::<f32>() - 0.5) * 100.0;
            let y = boss.pos.y + (state.rng.random::<f32>() - 0.5) * 50.0;
            state.deferred.push(Deferred {
                at_ms: state.clock_ms + i as f64 * 300.0,
                action: DeferredAction::DropSuper { x, y },
            });
        }
        state.boss_timer_ms = 0.0;
        state.boss_warning = false;
        state.defeat_counts.remove(&stage);
        state.emit(GameEvent::StageCleared { stage });
        log::info!("boss stage {stage} permanently defeated");
    } else {
        boss.escaping = true;
        // Kept alive through the flight so rendering still has a body
        boss.hp = 1;
        create_explosion(&mut state.rng, &mut state.particles, boss.pos, design.color, 50);
        state.boss = Some(boss);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::create_boss;
    use crate::sim::state::Bullet;
    use crate::sim::test_support::test_state;

    fn settled_boss(state: &mut GameState, stage: u32, defeat_count: u32) {
        let mut boss = create_boss(state.width, stage, defeat_count);
        boss.pos = Vec2::new(state.width / 2.0, boss.target_y);
        boss.entering = false;
        state.boss = Some(boss);
    }

    fn boss_hit(state: &mut GameState, damage: i32) {
        let pos = state.boss.as_ref().map(|b| b.pos).unwrap_or_default();
        state.bullets.push(Bullet {
            pos,
            vel: Vec2::new(0.0, -600.0),
            size: 4.0,
            color: "#00FFFF",
            damage,
            active: true,
        });
        resolve_bullets_vs_boss(state);
    }

    #[test]
    fn test_entrance_descends_to_target_and_stops() {
        let mut state = test_state();
        state.boss = Some(create_boss(state.width, 1, 0));
        for _ in 0..200 {
            state.clock_ms += 16.0;
            update_boss(&mut state, 16.0);
        }
        let boss = state.boss.as_ref().unwrap();
        assert!(!boss.entering);
        // Settled into the hover band around target_y
        assert!((boss.pos.y - boss.target_y).abs() <= 10.0);
    }

    #[test]
    fn test_first_kill_escapes_with_hp_pinned() {
        let mut state = test_state();
        settled_boss(&mut state, 1, 0);
        boss_hit(&mut state, 1000);

        let boss = state.boss.as_ref().unwrap();
        assert!(boss.escaping);
        assert_eq!(boss.hp, 1);
        assert_eq!(state.score, 300);
        assert!(state.defeat_counts.is_empty());
    }

    #[test]
    fn test_escape_counts_only_after_leaving_screen() {
        let mut state = test_state();
        settled_boss(&mut state, 1, 0);
        boss_hit(&mut state, 1000);

        // Further hits during the flight do nothing
        boss_hit(&mut state, 1000);
        assert!(state.boss.is_some());

        for _ in 0..600 {
            state.clock_ms += 16.0;
            update_boss(&mut state, 16.0);
            if state.boss.is_none() {
                break;
            }
        }
        assert!(state.boss.is_none());
        assert_eq!(state.defeat_counts.get(&1), Some(&1));
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::BossEscaped { stage: 1 })));
    }

    #[test]
    fn test_second_kill_is_permanent() {
        let mut state = test_state();
        state.defeat_counts.insert(1, 1);
        state.boss_timer_ms = 42_000.0;
        settled_boss(&mut state, 1, 1);
        boss_hit(&mut state, 1000);

        assert!(state.boss.is_none());
        assert_eq!(state.defeat_counts.get(&1), None);
        assert_eq!(state.boss_timer_ms, 0.0);
        // Three staggered SUPER drops queued
        let supers = state
            .deferred
            .iter()
            .filter(|d| matches!(d.action, DeferredAction::DropSuper { .. }))
            .count();
        assert_eq!(supers, 3);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::StageCleared { stage: 1 })));
    }

    #[test]
    fn test_spiral_fires_eight_bullets_after_interval() {
        let mut state = test_state();
        settled_boss(&mut state, 1, 0);
        state.clock_ms = 2000.0;
        if let Some(b) = state.boss.as_mut() {
            b.last_attack_ms = 0.0;
        }
        update_boss(&mut state, 16.0);
        assert_eq!(state.enemy_bullets.len(), 8);
        assert!(state.enemy_bullets.iter().all(|b| b.damage == 2));
    }

    #[test]
    fn test_wave_schedules_two_deferred_volleys() {
        let mut state = test_state();
        settled_boss(&mut state, 5, 0);
        state.clock_ms = 2000.0;
        if let Some(b) = state.boss.as_mut() {
            b.last_attack_ms = 0.0;
        }
        update_boss(&mut state, 16.0);
        // First volley immediate, two more 200 ms apart
        assert_eq!(state.enemy_bullets.len(), 9);
        assert_eq!(state.deferred.len(), 2);
    }
}
