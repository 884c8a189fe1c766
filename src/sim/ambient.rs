//! Day/night cycle and stars
//!
//! Lighting is a pure function of the score, repeating every `CYCLE_LENGTH`
//! points:
//!
//! | cycle score | lighting            | phase   | night |
//! |-------------|---------------------|---------|-------|
//! | 0..200      | day                 | 0       | no    |
//! | 200..500    | dusk                | 0 → 10  | no    |
//! | 500..700    | night               | 10      | yes   |
//! | 700..1000   | dawn                | 10 → 0  | yes   |

use rand::Rng;

use super::state::AmbientState;
use crate::consts::*;

/// Sky columns that may show a star
pub const STAR_COLUMNS: [u8; 6] = [4, 6, 8, 11, 13, 15];
/// Percent chance per regular star column per tick
pub const STAR_CHANCE: u32 = 40;
/// Percent chance of the star above the player's column
pub const SPECIAL_STAR_CHANCE: u32 = 60;

/// Integer linear remap with truncation toward zero
fn remap(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Lighting for a score: `(is_night, transition_phase)`
pub fn lighting_for_score(score: u64) -> (bool, u8) {
    let cycle = (score % CYCLE_LENGTH) as i64;
    match cycle {
        0..200 => (false, 0),
        200..500 => (false, remap(cycle, 200, 500, 0, 10).clamp(0, 10) as u8),
        500..700 => (true, 10),
        _ => (true, remap(cycle, 700, 1000, 10, 0).clamp(0, 10) as u8),
    }
}

impl AmbientState {
    /// Recompute lighting from the score
    pub fn update(&mut self, score: u64) {
        let (is_night, phase) = lighting_for_score(score);
        self.cycle_score = score % CYCLE_LENGTH;
        self.is_night = is_night;
        self.transition_phase = phase;
    }

    /// Stars are re-evaluated every `STAR_TIMER_LIMIT + 1` ticks
    pub fn update_star_timer(&mut self) {
        self.star_timer += 1;
        if self.star_timer > STAR_TIMER_LIMIT {
            self.star_timer = 0;
            self.stars_active = self.stars_eligible();
        }
    }

    /// Night or any part of a transition
    pub fn stars_eligible(&self) -> bool {
        self.is_night || self.transition_phase > 0
    }

    /// Roll this tick's star columns
    ///
    /// Regular columns come first in ascending order, then the player's column
    /// if its special star shows. Every tick draws afresh, so stars twinkle.
    pub fn draw_stars<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u8> {
        if !self.stars_active {
            return Vec::new();
        }

        let mut stars: Vec<u8> = STAR_COLUMNS
            .iter()
            .copied()
            .filter(|_| rng.random_range(0..100) < STAR_CHANCE)
            .collect();
        if rng.random_range(0..100) < SPECIAL_STAR_CHANCE {
            stars.push(PLAYER_COLUMN as u8);
        }
        log::trace!("Stars at {:?}", stars);
        stars
    }
}
