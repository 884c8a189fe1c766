//! Game state and core simulation types
//!
//! Everything a run needs lives in these plain structs; the session controller
//! owns one of each and hands them to the subsystem functions by reference.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Top-level state of the session controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen, waiting for start
    #[default]
    Idle,
    /// Active run
    Playing,
    /// Run ended, final score on screen
    GameOver,
}

/// Which display row the player occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalPosition {
    /// Sky row (mid-jump)
    Up,
    /// Ground row
    #[default]
    Ground,
}

impl VerticalPosition {
    pub fn row(self) -> u8 {
        match self {
            VerticalPosition::Up => SKY_ROW,
            VerticalPosition::Ground => GROUND_ROW,
        }
    }
}

/// The player's dinosaur
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub vertical: VerticalPosition,
    pub is_jumping: bool,
    pub is_ducking: bool,
    /// Ticks spent in the current jump (0..JUMP_DURATION)
    pub jump_frame: u32,
    /// Two-frame run animation toggle
    pub run_frame: bool,
    /// When the last jump started (cooldown gate)
    pub last_jump_ms: Option<u64>,
    /// When the run animation was last considered
    pub last_animation_ms: u64,
}

impl PlayerState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_animation_ms: now_ms,
            ..Default::default()
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.vertical == VerticalPosition::Ground
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    SmallCactus,
    BigCactus,
    Bird,
}

impl ObstacleKind {
    pub fn is_cactus(self) -> bool {
        !matches!(self, ObstacleKind::Bird)
    }
}

/// The single primary obstacle plus its optional doubled cactus companion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Column of the primary obstacle (decreases as it scrolls left)
    pub position: i32,
    /// A second cactus trails the primary
    pub is_doubled: bool,
    /// Column of the companion, only meaningful while `is_doubled`
    pub second_position: i32,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            kind: ObstacleKind::SmallCactus,
            position: OBSTACLE_START_COLUMN,
            is_doubled: false,
            second_position: DOUBLE_CACTUS_PARKED,
        }
    }
}

impl Obstacle {
    /// Primary obstacle has scrolled fully off the left edge
    pub fn is_gone(&self) -> bool {
        self.position < OBSTACLE_GONE_COLUMN
    }
}

/// Score and speed of the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// One point per obstacle move step
    pub score: u64,
    /// Best score seen since power-on (never decreases)
    pub high_score: u64,
    /// Moves per 1.5 s; bounded by MAX_SPEED
    pub game_speed: u32,
}

impl Default for DifficultyState {
    fn default() -> Self {
        Self {
            score: 0,
            high_score: 0,
            game_speed: START_SPEED,
        }
    }
}

/// Day/night lighting derived from the score
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmbientState {
    /// score mod CYCLE_LENGTH
    pub cycle_score: u64,
    pub is_night: bool,
    /// 0 = full day, 10 = full night
    pub transition_phase: u8,
    pub stars_active: bool,
    /// Ticks since the stars flag was last re-evaluated
    pub star_timer: u32,
}

/// Spacing counter between obstacle spawns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObstacleGenerator {
    pub gap: i32,
    /// When the obstacle last moved one column
    pub last_move_ms: u64,
}

/// Something the simulation wants the outside world to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Ducked,
    Spawned { kind: ObstacleKind, doubled: bool },
    SpeedUp { speed: u32 },
    Collision,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
