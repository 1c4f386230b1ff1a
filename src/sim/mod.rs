//! Deterministic game simulation.
//!
//! Everything gameplay-visible lives in [`GameState`] and is advanced by
//! [`step`] with an explicit frame input and a millisecond delta. The module
//! has no rendering, no wall-clock time and no global state: two states
//! built with the same seed and fed the same inputs stay identical forever.
//! Side effects the embedder cares about (sounds, HUD changes, game over)
//! come out as [`GameEvent`] values drained after each step.

pub mod boss;
pub mod collision;
pub mod entity;
pub mod events;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod step;
pub mod types;

pub use events::{GameEvent, SoundCue};
pub use powerup::{HudIndicator, hud_indicators};
pub use state::{GamePhase, GameState};
pub use step::{FrameInput, step};
pub use types::{AttackPattern, BossStage, EnemyKind, PowerUpKind};
