//! Closed type tables for enemies, bosses, and power-ups
//!
//! All gameplay tuning lives in these tables. The tables are closed: an
//! unknown kind is a programming error, not a runtime condition, so lookups
//! are total functions over the enums.

use serde::{Deserialize, Serialize};

/// Horizontal drift behavior for regular enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Straight descent
    Straight,
    /// Fast sinusoidal weave driven by the wobble phase
    Zigzag,
    /// Slow sinusoidal drift driven by lifetime
    Wave,
}

/// Regular enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Tank,
    Swarm,
    Ghost,
    Shooter,
}

/// Static per-kind enemy tuning
#[derive(Debug, Clone, Copy)]
pub struct EnemyType {
    pub name: &'static str,
    pub hp: i32,
    pub color: &'static str,
    /// Cosmetic particle cloud size (generated once at creation)
    pub particle_count: usize,
    /// Collision radius (px)
    pub size: f32,
    /// Descent speed (px/sec)
    pub speed: f32,
    /// Base score value, multiplied by the current level on kill
    pub score: u64,
    /// Probability of dropping a power-up on death
    pub drop_chance: f32,
    /// Visual decay added per bullet hit
    pub dissolve_rate: f32,
    pub behavior: Behavior,
    /// Fire interval in ms, if this kind shoots
    pub fire_interval_ms: Option<f64>,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Normal,
        EnemyKind::Tank,
        EnemyKind::Swarm,
        EnemyKind::Ghost,
        EnemyKind::Shooter,
    ];

    pub fn stats(self) -> &'static EnemyType {
        match self {
            EnemyKind::Normal => &EnemyType {
                name: "Normal",
                hp: 1,
                color: "#00BFFF",
                particle_count: 8,
                size: 15.0,
                speed: 120.0,
                score: 10,
                drop_chance: 0.05,
                dissolve_rate: 0.03,
                behavior: Behavior::Straight,
                fire_interval_ms: None,
            },
            EnemyKind::Tank => &EnemyType {
                name: "Tank",
                hp: 3,
                color: "#FF4500",
                particle_count: 12,
                size: 25.0,
                speed: 60.0,
                score: 30,
                drop_chance: 0.15,
                dissolve_rate: 0.02,
                behavior: Behavior::Straight,
                fire_interval_ms: None,
            },
            EnemyKind::Swarm => &EnemyType {
                name: "Swarm",
                hp: 1,
                color: "#00FF7F",
                particle_count: 5,
                size: 10.0,
                speed: 240.0,
                score: 15,
                drop_chance: 0.08,
                dissolve_rate: 0.05,
                behavior: Behavior::Zigzag,
                fire_interval_ms: None,
            },
            EnemyKind::Ghost => &EnemyType {
                name: "Ghost",
                hp: 2,
                color: "#9400D3",
                particle_count: 10,
                size: 20.0,
                speed: 150.0,
                score: 25,
                drop_chance: 0.12,
                dissolve_rate: 0.025,
                behavior: Behavior::Wave,
                fire_interval_ms: None,
            },
            EnemyKind::Shooter => &EnemyType {
                name: "Shooter",
                hp: 2,
                color: "#FF1493",
                particle_count: 10,
                size: 18.0,
                speed: 90.0,
                score: 35,
                drop_chance: 0.10,
                dissolve_rate: 0.025,
                behavior: Behavior::Straight,
                fire_interval_ms: Some(2000.0),
            },
        }
    }
}

/// Boss body shapes (rendering hint only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    Star,
    Octagon,
    Prism,
}

/// Boss attack pattern variants, fixed per stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Rotating 8-way ring
    Spiral,
    /// Downward 7-bullet fan
    Spread,
    /// Three bullets aimed at the player's position at fire time
    Homing,
    /// 16-way radial burst
    Radial,
    /// Three staggered volleys of weaving bullets
    Wave,
    /// 12 bullets at random angles and speeds
    Chaos,
    /// 20 fast near-vertical bullets
    Laser,
    /// 14-way burst cycling through rainbow colors
    Rainbow,
}

/// Static per-stage boss design. The stage table never changes at runtime;
/// stages past the end of the table reuse the final design.
#[derive(Debug, Clone, Copy)]
pub struct BossStage {
    pub name: &'static str,
    pub color: &'static str,
    pub secondary_color: &'static str,
    /// Collision radius (px)
    pub size: f32,
    pub hp: i32,
    pub shape: BossShape,
    pub attack_pattern: AttackPattern,
    /// Interval between attack dispatches (ms)
    pub attack_interval_ms: f64,
    pub bullet_color: &'static str,
    /// Score awarded when hp reaches zero (first and second defeat alike)
    pub score: u64,
}

pub const BOSS_STAGES: [BossStage; 8] = [
    BossStage {
        name: "MEGA COVIDO",
        color: "#FF0000",
        secondary_color: "#FF4500",
        size: 80.0,
        hp: 30,
        shape: BossShape::Circle,
        attack_pattern: AttackPattern::Spiral,
        attack_interval_ms: 1500.0,
        bullet_color: "#FF0000",
        score: 300,
    },
    BossStage {
        name: "CYBER WRAITH",
        color: "#0066FF",
        secondary_color: "#00BFFF",
        size: 90.0,
        hp: 35,
        shape: BossShape::Square,
        attack_pattern: AttackPattern::Spread,
        attack_interval_ms: 1400.0,
        bullet_color: "#00BFFF",
        score: 350,
    },
    BossStage {
        name: "NEON PHANTOM",
        color: "#8B00FF",
        secondary_color: "#9400D3",
        size: 100.0,
        hp: 40,
        shape: BossShape::Triangle,
        attack_pattern: AttackPattern::Homing,
        attack_interval_ms: 1300.0,
        bullet_color: "#9400D3",
        score: 400,
    },
    BossStage {
        name: "SOLAR GUARDIAN",
        color: "#FFD700",
        secondary_color: "#FFA500",
        size: 85.0,
        hp: 45,
        shape: BossShape::Diamond,
        attack_pattern: AttackPattern::Radial,
        attack_interval_ms: 1200.0,
        bullet_color: "#FFD700",
        score: 450,
    },
    BossStage {
        name: "TOXIC VIPER",
        color: "#00FF00",
        secondary_color: "#00FF7F",
        size: 95.0,
        hp: 50,
        shape: BossShape::Hexagon,
        attack_pattern: AttackPattern::Wave,
        attack_interval_ms: 1100.0,
        bullet_color: "#00FF7F",
        score: 500,
    },
    BossStage {
        name: "PLASMA STORM",
        color: "#FF00FF",
        secondary_color: "#00FFFF",
        size: 110.0,
        hp: 55,
        shape: BossShape::Star,
        attack_pattern: AttackPattern::Chaos,
        attack_interval_ms: 1000.0,
        bullet_color: "#FF00FF",
        score: 550,
    },
    BossStage {
        name: "SHADOW EMPEROR",
        color: "#1a1a1a",
        secondary_color: "#4a4a4a",
        size: 120.0,
        hp: 60,
        shape: BossShape::Octagon,
        attack_pattern: AttackPattern::Laser,
        attack_interval_ms: 900.0,
        bullet_color: "#FFFFFF",
        score: 600,
    },
    BossStage {
        name: "PRISM OVERLORD",
        color: "#FF0000",
        secondary_color: "#00FFFF",
        size: 130.0,
        hp: 70,
        shape: BossShape::Prism,
        attack_pattern: AttackPattern::Rainbow,
        attack_interval_ms: 800.0,
        bullet_color: "#FF0000",
        score: 700,
    },
];

/// Bullet colors cycled by the Rainbow attack pattern
pub const RAINBOW_COLORS: [&str; 7] = [
    "#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#9400D3",
];

/// Look up the stage design for a 1-based stage number, clamping to the
/// last defined entry.
pub fn stage_design(stage_number: u32) -> &'static BossStage {
    let idx = (stage_number.saturating_sub(1) as usize).min(BOSS_STAGES.len() - 1);
    &BOSS_STAGES[idx]
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    Shield,
    SpreadShot,
    SpeedBoost,
    Bomb,
    Super,
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::RapidFire,
        PowerUpKind::Shield,
        PowerUpKind::SpreadShot,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Bomb,
        PowerUpKind::Super,
        PowerUpKind::ExtraLife,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::SpreadShot => "Spread Shot",
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::Bomb => "Bomb",
            PowerUpKind::Super => "1 Super",
            PowerUpKind::ExtraLife => "+1 Life",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "#FFD700",
            PowerUpKind::Shield => "#00BFFF",
            PowerUpKind::SpreadShot => "#FF69B4",
            PowerUpKind::SpeedBoost => "#00FF7F",
            PowerUpKind::Bomb => "#FF4500",
            PowerUpKind::Super => "#FF00FF",
            PowerUpKind::ExtraLife => "#FF1493",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "⚡",
            PowerUpKind::Shield => "🛡",
            PowerUpKind::SpreadShot => "✦",
            PowerUpKind::SpeedBoost => "💨",
            PowerUpKind::Bomb => "💣",
            PowerUpKind::Super => "⭐",
            PowerUpKind::ExtraLife => "❤",
        }
    }

    /// Effect duration in ms. Zero means the effect is instantaneous.
    pub fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::RapidFire => 8000.0,
            PowerUpKind::Shield => 6000.0,
            PowerUpKind::SpreadShot => 10_000.0,
            PowerUpKind::SpeedBoost => 7000.0,
            PowerUpKind::Super => 5000.0,
            PowerUpKind::Bomb | PowerUpKind::ExtraLife => 0.0,
        }
    }

    /// Whether the effect sets a timed flag on the player
    pub fn is_timed(self) -> bool {
        self.duration_ms() > 0.0
    }
}
