//! Dino Run - a side-scrolling runner for 16x2 character displays
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, obstacles, ambient cycle, session)
//! - `renderer`: Frame render model, glyph table and display sinks
//! - `platform`: Clock and input abstractions
//! - `audio`: Tone table and audio sinks
//! - `settings`: Runtime settings

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{GameSession, SessionState};

/// Game configuration constants
pub mod consts {
    /// Display columns
    pub const COLS: i32 = 16;
    /// Display rows
    pub const ROWS: u8 = 2;
    /// Sky row (sun/moon, stars, score)
    pub const SKY_ROW: u8 = 0;
    /// Ground row (player when grounded, obstacles)
    pub const GROUND_ROW: u8 = 1;

    /// Column the player stands in; the only column checked for collisions
    pub const PLAYER_COLUMN: i32 = 2;

    /// Default scheduler cadence
    pub const TICK_MS: u64 = 50;

    /// Jump length in ticks
    pub const JUMP_DURATION: u32 = 15;
    /// A new jump needs strictly more than this since the previous jump start
    pub const JUMP_COOLDOWN_MS: u64 = 200;
    /// Run animation frame period
    pub const RUN_ANIMATION_MS: u64 = 200;
    /// Title screen dino animation period
    pub const TITLE_ANIMATION_MS: u64 = 500;

    /// Obstacle column at the start of a run (off-screen right)
    pub const OBSTACLE_START_COLUMN: i32 = 25;
    /// Column a freshly spawned obstacle appears at
    pub const OBSTACLE_SPAWN_COLUMN: i32 = 16;
    /// Obstacles left of this column are gone
    pub const OBSTACLE_GONE_COLUMN: i32 = -3;
    /// Doubled cactus trails the primary by this many columns
    pub const DOUBLE_CACTUS_OFFSET: i32 = 2;
    /// Where an inactive doubled cactus is parked
    pub const DOUBLE_CACTUS_PARKED: i32 = -5;

    /// Game speed at the start of a run
    pub const START_SPEED: u32 = 8;
    /// Game speed never exceeds this
    pub const MAX_SPEED: u32 = 18;
    /// Score points per speed step
    pub const SPEED_STEP_SCORE: u64 = 20;
    /// Move interval numerator: interval = MOVE_BASE_MS / speed
    pub const MOVE_BASE_MS: u64 = 1500;

    /// Length of one day/night cycle in score points
    pub const CYCLE_LENGTH: u64 = 1000;
    /// Stars flag is re-evaluated once the timer exceeds this
    pub const STAR_TIMER_LIMIT: u32 = 10;

    /// Custom glyphs are re-uploaded this often during play
    pub const GLYPH_REFRESH_MS: u64 = 30_000;
    /// Settle delay after the start melody
    pub const START_SETTLE_MS: u64 = 300;
}
