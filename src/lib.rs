//! Space Snake - an arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, boss fights, game state)
//! - `persistence`: High score and credit storage (LocalStorage on web)
//!
//! Rendering, audio playback, and UI are external collaborators: the
//! simulation exposes renderable entity state each frame and emits
//! [`sim::GameEvent`]s for everything the embedder needs to react to.

pub mod persistence;
pub mod sim;

pub use sim::{FrameInput, GameEvent, GameState, SoundCue, step};

/// Game configuration constants
pub mod consts {
    /// Default playfield dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player ship defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Base movement speed (px/sec)
    pub const PLAYER_SPEED: f32 = 480.0;
    /// Base fire interval (ms)
    pub const PLAYER_FIRE_INTERVAL_MS: f64 = 200.0;
    /// Rapid fire divides the base interval by this factor
    pub const RAPID_FIRE_FACTOR: f64 = 2.5;
    /// Super mode fire interval (ms)
    pub const SUPER_FIRE_INTERVAL_MS: f64 = 50.0;
    /// Speed boost movement multiplier
    pub const SPEED_BOOST_FACTOR: f32 = 1.8;
    /// Pointer-follow speed multiplier
    pub const POINTER_FOLLOW_FACTOR: f32 = 1.5;

    /// Player bullet speed (px/sec)
    pub const BULLET_SPEED: f32 = 600.0;
    /// Enemy aimed-bullet speed (px/sec)
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;

    /// Lives at game start, and the hard cap from extra-life pickups
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 9;
    /// Post-hit invulnerability window (ms)
    pub const INVULN_DURATION_MS: f64 = 2000.0;

    /// Score required per level
    pub const SCORE_PER_LEVEL: u64 = 500;

    /// Boss spawns every time this much simulation time accumulates (ms)
    pub const BOSS_TIMER_MS: f64 = 60_000.0;
    /// Warning window before the boss arrives (ms)
    pub const BOSS_WARNING_MS: f64 = 10_000.0;
    /// Vertical descent speed during the boss entrance (px/sec)
    pub const BOSS_ENTER_SPEED: f32 = 120.0;
    /// Hover altitude once the entrance finishes
    pub const BOSS_TARGET_Y: f32 = 80.0;
    /// Straight-line flight speed while escaping (px/sec)
    pub const BOSS_ESCAPE_SPEED: f32 = 720.0;

    /// Power-up pickup descent speed (px/sec)
    pub const POWER_UP_FALL_SPEED: f32 = 90.0;
    /// Pickup collision radius
    pub const POWER_UP_SIZE: f32 = 25.0;

    /// Per-frame (at 60fps) enemy spawn probability: base + per-level
    pub const SPAWN_CHANCE_BASE: f32 = 0.02;
    pub const SPAWN_CHANCE_PER_LEVEL: f32 = 0.005;
    /// Active-enemy cap: base + per-level
    pub const ENEMY_CAP_BASE: usize = 10;
    pub const ENEMY_CAP_PER_LEVEL: usize = 2;
}

/// Initialize logging for wasm builds (console_log + panic hook)
#[cfg(target_arch = "wasm32")]
pub fn init_wasm_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
