//! Entity factories
//!
//! Pure constructors for enemies, bosses, pickups, and particle bursts.
//! All randomness flows through the state's seeded RNG so runs replay
//! deterministically.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::state::{Boss, CloudParticle, Enemy, Particle, PowerUp};
use super::types::{EnemyKind, PowerUpKind, stage_design};
use crate::consts::*;

/// Build a regular enemy of a random kind, above the top edge at a random
/// x inset from the sides. Hp scales with level: `base + level / 3`.
pub fn create_enemy(rng: &mut Pcg32, canvas_width: f32, level: u32) -> Enemy {
    let kind = EnemyKind::ALL[rng.random_range(0..EnemyKind::ALL.len())];
    let stats = kind.stats();

    // Fixed cosmetic cloud, generated once and reused for dissolve visuals
    let mut cloud = Vec::with_capacity(stats.particle_count);
    for i in 0..stats.particle_count {
        let angle = (TAU / stats.particle_count as f32) * i as f32 + rng.random::<f32>() * 0.3;
        let radius = stats.size * 0.4 + rng.random::<f32>() * stats.size * 0.3;
        let size = stats.size * 0.3 + rng.random::<f32>() * stats.size * 0.2;
        cloud.push(CloudParticle {
            offset: Vec2::new(angle.cos(), angle.sin()) * radius,
            size,
        });
    }

    let hp = stats.hp + (level / 3) as i32;
    Enemy {
        pos: Vec2::new(
            rng.random::<f32>() * (canvas_width - 100.0) + 50.0,
            -50.0,
        ),
        kind,
        hp,
        max_hp: hp,
        dissolve: 0.0,
        cloud,
        time_ms: 0.0,
        wobble_phase: rng.random::<f32>() * TAU,
        last_shot_ms: 0.0,
    }
}

/// Build the boss for a 1-based stage number, off-screen above the field.
/// Hp comes straight from the stage design and is not level-scaled, unlike
/// regular enemies. `defeat_count` flags a second appearance (visual only).
pub fn create_boss(canvas_width: f32, stage_number: u32, defeat_count: u32) -> Boss {
    let design = stage_design(stage_number);
    Boss {
        pos: Vec2::new(canvas_width / 2.0, -150.0),
        stage_number,
        hp: design.hp,
        max_hp: design.hp,
        target_y: BOSS_TARGET_Y,
        last_attack_ms: 0.0,
        attack_angle: 0.0,
        time_ms: 0.0,
        entering: true,
        escaping: false,
        escape_dir: None,
        second_appearance: defeat_count == 1,
    }
}

/// Build a pickup at the given position. A uniformly random kind unless one
/// is forced by a special-kill rule.
pub fn create_power_up(rng: &mut Pcg32, x: f32, y: f32, forced: Option<PowerUpKind>) -> PowerUp {
    let kind =
        forced.unwrap_or_else(|| PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())]);
    PowerUp {
        pos: Vec2::new(x, y),
        kind,
        size: POWER_UP_SIZE,
        fall_speed: POWER_UP_FALL_SPEED,
        rotation: 0.0,
    }
}

/// Radial particle burst for explosions
pub fn create_explosion(
    rng: &mut Pcg32,
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: &'static str,
    count: usize,
) {
    for i in 0..count {
        let angle = (TAU / count as f32) * i as f32;
        // 120..360 px/sec
        let speed = rng.random::<f32>() * 240.0 + 120.0;
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            size: rng.random::<f32>() * 4.0 + 2.0,
            color,
            life: 1.0,
            decay: rng.random::<f32>() * 1.8 + 1.2,
            is_dissolve: false,
        });
    }
}

/// Scatter an enemy's cosmetic cloud as shrinking dissolve particles
pub fn create_dissolve_effect(rng: &mut Pcg32, particles: &mut Vec<Particle>, enemy: &Enemy) {
    for cp in &enemy.cloud {
        particles.push(Particle {
            pos: enemy.pos + cp.offset,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 360.0,
                (rng.random::<f32>() - 0.5) * 360.0,
            ),
            size: cp.size,
            color: enemy.stats().color,
            life: 1.0,
            decay: rng.random::<f32>() * 1.2 + 1.2,
            is_dissolve: true,
        });
    }
}
