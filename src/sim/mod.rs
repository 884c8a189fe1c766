//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, button samples and
//! clock readings, a session plays out identically:
//! - Seeded RNG only
//! - Fixed per-tick pipeline order
//! - No rendering or platform dependencies beyond the sink traits

pub mod ambient;
pub mod collision;
pub mod obstacles;
pub mod player;
pub mod session;
pub mod state;

pub use ambient::lighting_for_score;
pub use collision::check_collision;
pub use obstacles::{ObstacleMutation, game_speed_for_score, gap_range, move_interval_ms};
pub use session::{GameSession, Peripherals, RunState, TickInput};
pub use state::{
    AmbientState, DifficultyState, GameEvent, Obstacle, ObstacleGenerator, ObstacleKind,
    PlayerState, SessionState, VerticalPosition,
};
