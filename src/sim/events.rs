//! Events emitted by the simulation step
//!
//! The step never calls into UI or audio code directly. It appends
//! [`GameEvent`]s to the state's queue; the embedder drains the queue after
//! each step and routes entries to the HUD, the audio player, and
//! persistence. Events are emitted immediately after the corresponding
//! state change, in step order.

use serde::{Deserialize, Serialize};

use super::types::PowerUpKind;

/// Fire-and-forget audio trigger points. Playback failures are the audio
/// layer's problem; the simulation never waits on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    EnemyHit,
    EnemyDestroy,
    PowerUp,
    BossDead,
    GameOver,
    /// Never raised by the step itself; the embedder routes this one at the
    /// game-over boundary when [`crate::persistence::Progress::record_score`]
    /// reports a new record.
    NewHighScore,
}

/// Discrete notifications for the UI callback sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Total score after a change
    ScoreChanged(u64),
    /// Remaining lives after a change
    LivesChanged(u32),
    /// Player crossed a score threshold
    LevelUp { level: u32, cycle: u32 },
    /// Boss arrives within ten seconds (raised), or the window closed
    BossWarning(bool),
    /// A boss entered the field for the given stage number
    BossSpawned { stage: u32 },
    /// First-defeat escape completed; the boss left the screen
    BossEscaped { stage: u32 },
    /// Second defeat of the stage; the boss is gone for good
    StageCleared { stage: u32 },
    /// A timed or instant power-up took effect
    PowerUpActivated(PowerUpKind),
    /// Lives ran out
    GameOver { score: u64, stage: u32 },
    /// Audio trigger
    Sound(SoundCue),
}
