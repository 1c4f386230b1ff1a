//! Game state and core simulation types
//!
//! Everything the simulation mutates per frame lives in one explicit
//! [`GameState`] owned by the embedder. The renderer reads snapshots of the
//! entity collections after a step completes; nothing outside the step
//! mutates them.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::events::GameEvent;
use super::types::{BossStage, EnemyKind, EnemyType, PowerUpKind, stage_design};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation clock is frozen; timed effects are suspended with it
    Paused,
    /// Run ended
    GameOver,
}

/// The player ship. One instance per game session.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Base movement speed (px/sec), before speed boost
    pub speed: f32,
    pub has_shield: bool,
    pub rapid_fire: bool,
    pub spread_shot: bool,
    pub speed_boost: bool,
    pub super_mode: bool,
    /// Simulation timestamp of the last shot (ms)
    pub last_shot_ms: f64,
    /// Base fire interval (ms)
    pub fire_interval_ms: f64,
    pub auto_fire: bool,
}

impl Player {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(width / 2.0, height - 100.0),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            has_shield: false,
            rapid_fire: false,
            spread_shot: false,
            speed_boost: false,
            super_mode: false,
            last_shot_ms: 0.0,
            fire_interval_ms: PLAYER_FIRE_INTERVAL_MS,
            auto_fire: true,
        }
    }

    /// Effective movement speed for this frame
    pub fn current_speed(&self) -> f32 {
        if self.speed_boost {
            self.speed * SPEED_BOOST_FACTOR
        } else {
            self.speed
        }
    }
}

/// One cosmetic particle in an enemy's cloud, generated once at creation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CloudParticle {
    pub offset: Vec2,
    pub size: f32,
}

/// A regular enemy
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub hp: i32,
    pub max_hp: i32,
    /// Visual decay (0..1), accumulated per bullet hit
    pub dissolve: f32,
    /// Cosmetic particle cloud used for rendering and dissolve effects
    pub cloud: Vec<CloudParticle>,
    /// Lifetime (ms), drives Wave drift
    pub time_ms: f64,
    /// Drives Zigzag drift
    pub wobble_phase: f32,
    /// Simulation timestamp of the last shot (ms), for shooting kinds
    pub last_shot_ms: f64,
}

impl Enemy {
    pub fn stats(&self) -> &'static EnemyType {
        self.kind.stats()
    }
}

/// The boss. At most one exists at a time.
#[derive(Debug, Clone, Serialize)]
pub struct Boss {
    pub pos: Vec2,
    /// 1-based stage number this boss was created for (may exceed the
    /// stage table; the design lookup clamps)
    pub stage_number: u32,
    pub hp: i32,
    pub max_hp: i32,
    /// Hover altitude reached at the end of the entrance
    pub target_y: f32,
    /// Simulation timestamp of the last attack dispatch (ms)
    pub last_attack_ms: f64,
    /// Rotating phase shared by Spiral/Radial/Wave patterns
    pub attack_angle: f32,
    /// Lifetime (ms), drives the idle bob
    pub time_ms: f64,
    /// Descending from off-screen toward target_y
    pub entering: bool,
    /// Fleeing after a first defeat
    pub escaping: bool,
    /// Flight direction, computed once when the escape starts and then
    /// held constant for the whole flight
    pub escape_dir: Option<Vec2>,
    /// True when this stage was already defeated once this run
    pub second_appearance: bool,
}

impl Boss {
    pub fn design(&self) -> &'static BossStage {
        stage_design(self.stage_number)
    }
}

/// A player-fired bullet
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// px/sec
    pub vel: Vec2,
    pub size: f32,
    pub color: &'static str,
    pub damage: i32,
    /// Cleared when the bullet is consumed by a collision; filtered at the
    /// end of the enemy pass. At most one collision per bullet per frame.
    pub active: bool,
}

/// A bullet fired by an enemy or the boss
#[derive(Debug, Clone, Serialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    /// px/sec
    pub vel: Vec2,
    pub size: f32,
    pub color: &'static str,
    pub damage: i32,
    /// Aimed at the player at fire time (rendering hint)
    pub homing: bool,
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub size: f32,
    /// Descent speed (px/sec)
    pub fall_speed: f32,
    /// Spin for rendering (radians)
    pub rotation: f32,
}

/// A cosmetic explosion/dissolve particle
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    /// px/sec
    pub vel: Vec2,
    pub size: f32,
    pub color: &'static str,
    /// 1.0 at birth, dead at 0
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
    /// Dissolve particles also shrink over time
    pub is_dissolve: bool,
}

/// Minimum rendered particle size before culling
pub const PARTICLE_MIN_SIZE: f32 = 0.5;

/// A timed player effect, one entry per distinct kind. Re-collecting the
/// same kind refreshes `expires_at_ms` instead of adding an entry; this is
/// also the HUD indicator source.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Absolute simulation time (ms)
    pub expires_at_ms: f64,
}

/// Work scheduled against the simulation clock instead of wall-clock
/// timers, so pausing suspends it and dropping the state cancels it.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum DeferredAction {
    /// Staggered SUPER drop after a permanent boss defeat
    DropSuper { x: f32, y: f32 },
    /// Delayed volley of the boss Wave attack pattern
    WaveVolley,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Deferred {
    pub at_ms: f64,
    pub action: DeferredAction,
}

/// Complete simulation state for one game session
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Playfield dimensions (px)
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Progression counter, `score / 500 + 1`
    pub level: u32,
    /// Full passes through the boss stage table
    pub cycle: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    /// Timed power-up effects, one entry per kind
    pub active_effects: Vec<ActiveEffect>,
    /// Post-hit invulnerability deadline, if one is running
    pub hit_invuln_until_ms: Option<f64>,
    /// Deferred simulation-time actions
    pub deferred: Vec<Deferred>,
    /// Per-stage defeat counter; a stage is present with value 1 after its
    /// first (escape) defeat and removed entirely on the second
    pub defeat_counts: BTreeMap<u32, u32>,
    /// Accumulates while no boss is active; boss spawns at 60 000 ms
    pub boss_timer_ms: f64,
    /// Warning flag exposed to the HUD for the last ten seconds
    pub boss_warning: bool,
    /// Simulation clock (ms since game start, paused time excluded)
    pub clock_ms: f64,
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    /// Events produced this step, drained by the embedder
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game session with the given playfield size and seed
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            phase: GamePhase::Playing,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            cycle: 1,
            player: Player::new(width, height),
            enemies: Vec::new(),
            boss: None,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            active_effects: Vec::new(),
            hit_invuln_until_ms: None,
            deferred: Vec::new(),
            defeat_counts: BTreeMap::new(),
            boss_timer_ms: 0.0,
            boss_warning: false,
            clock_ms: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Queue an event for the embedder
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this step's events. Call after each step.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add points and notify the HUD
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        let score = self.score;
        self.emit(GameEvent::ScoreChanged(score));
    }

    /// Boss stage number for the current level
    pub fn stage_number(&self) -> u32 {
        self.level / 2 + 1
    }

    /// Active-enemy cap for the current level
    pub fn enemy_cap(&self) -> usize {
        ENEMY_CAP_BASE + ENEMY_CAP_PER_LEVEL * self.level as usize
    }

    /// Whether the timed effect of the given kind is currently active
    pub fn effect_active(&self, kind: PowerUpKind) -> bool {
        self.active_effects.iter().any(|e| e.kind == kind)
    }
}
