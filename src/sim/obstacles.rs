//! Obstacle generation and movement
//!
//! One primary obstacle scrolls left across the ground row, optionally trailed
//! by a doubled cactus. Once the primary leaves the screen the generator counts
//! ticks until a randomly drawn gap is exceeded and then respawns it on the
//! right edge. Spacing and obstacle mix tighten as the score climbs.

use rand::Rng;

use super::state::{DifficultyState, GameEvent, Obstacle, ObstacleGenerator, ObstacleKind};
use crate::consts::*;

/// Spawn gap range for scores below `below`
#[derive(Debug, Clone, Copy)]
struct GapPolicy {
    below: u64,
    min_gap: i32,
    max_gap: i32,
}

const GAP_POLICY: [GapPolicy; 4] = [
    GapPolicy {
        below: 20,
        min_gap: 2,
        max_gap: 5,
    },
    GapPolicy {
        below: 50,
        min_gap: 1,
        max_gap: 4,
    },
    GapPolicy {
        below: 100,
        min_gap: 0,
        max_gap: 3,
    },
    GapPolicy {
        below: u64::MAX,
        min_gap: 0,
        max_gap: 2,
    },
];

/// Percent weights for scores below `below`; birds get the remainder
#[derive(Debug, Clone, Copy)]
struct KindWeights {
    below: u64,
    small_cactus: u32,
    big_cactus: u32,
}

const KIND_WEIGHTS: [KindWeights; 4] = [
    KindWeights {
        below: 15,
        small_cactus: 60,
        big_cactus: 25,
    },
    KindWeights {
        below: 40,
        small_cactus: 50,
        big_cactus: 30,
    },
    KindWeights {
        below: 80,
        small_cactus: 40,
        big_cactus: 35,
    },
    KindWeights {
        below: u64::MAX,
        small_cactus: 35,
        big_cactus: 30,
    },
];

/// Percent chance that a cactus spawns doubled
const DOUBLE_CACTUS_CHANCE: u32 = 30;

/// What `advance` did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleMutation {
    /// An obstacle is still on its way across the screen
    Active,
    /// Counting toward the next spawn
    Waiting,
    /// A fresh obstacle appeared at the spawn column
    Spawned { kind: ObstacleKind, doubled: bool },
}

/// Gap range `(min, max)` for a score
pub fn gap_range(score: u64) -> (i32, i32) {
    let policy = GAP_POLICY
        .iter()
        .find(|p| score < p.below)
        .unwrap_or(&GAP_POLICY[GAP_POLICY.len() - 1]);
    (policy.min_gap, policy.max_gap)
}

/// Game speed reached at a score: one step per `SPEED_STEP_SCORE`, capped
pub fn game_speed_for_score(score: u64) -> u32 {
    let steps = (score / SPEED_STEP_SCORE).min(u64::from(MAX_SPEED - START_SPEED));
    START_SPEED + steps as u32
}

/// Milliseconds between single-column moves at a speed
pub fn move_interval_ms(game_speed: u32) -> u64 {
    MOVE_BASE_MS / u64::from(game_speed.max(1))
}

/// Uniform draw from `lo..hi`, or `lo` when the range is empty
fn draw<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if lo >= hi { lo } else { rng.random_range(lo..hi) }
}

fn percent<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(0..100)
}

fn choose_kind<R: Rng + ?Sized>(rng: &mut R, score: u64) -> ObstacleKind {
    let weights = KIND_WEIGHTS
        .iter()
        .find(|w| score < w.below)
        .unwrap_or(&KIND_WEIGHTS[KIND_WEIGHTS.len() - 1]);

    let roll = percent(rng);
    if roll < weights.small_cactus {
        ObstacleKind::SmallCactus
    } else if roll < weights.small_cactus + weights.big_cactus {
        ObstacleKind::BigCactus
    } else {
        ObstacleKind::Bird
    }
}

impl DifficultyState {
    /// Award one point for a move step, tracking high score and speed
    pub fn record_point(&mut self) -> Option<GameEvent> {
        self.score = self.score.saturating_add(1);
        self.high_score = self.high_score.max(self.score);

        let speed = game_speed_for_score(self.score);
        if speed != self.game_speed {
            self.game_speed = speed;
            return Some(GameEvent::SpeedUp { speed });
        }
        None
    }
}

impl ObstacleGenerator {
    pub fn new(now_ms: u64) -> Self {
        Self {
            gap: 0,
            last_move_ms: now_ms,
        }
    }

    /// Shift the obstacle (and its companion) one column left once the move
    /// interval has elapsed. Every move scores a point.
    pub fn move_obstacles(
        &mut self,
        obstacle: &mut Obstacle,
        difficulty: &mut DifficultyState,
        now_ms: u64,
    ) -> (bool, Option<GameEvent>) {
        let interval = move_interval_ms(difficulty.game_speed);
        if now_ms.saturating_sub(self.last_move_ms) < interval {
            return (false, None);
        }

        obstacle.position = obstacle.position.saturating_sub(1);
        if obstacle.is_doubled {
            obstacle.second_position -= 1;
            if obstacle.second_position < OBSTACLE_GONE_COLUMN {
                obstacle.is_doubled = false;
            }
        }
        self.last_move_ms = now_ms;

        let event = difficulty.record_point();
        log::trace!(
            "Obstacle moved to {} (score {})",
            obstacle.position,
            difficulty.score
        );
        (true, event)
    }

    /// Count toward and perform the next spawn
    ///
    /// The gap grows once per tick while the screen is clear. A spawn happens
    /// when it exceeds a threshold drawn from the score's gap range; afterwards
    /// the gap is re-seeded so spawns come in uneven bursts.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        obstacle: &mut Obstacle,
        score: u64,
        rng: &mut R,
    ) -> ObstacleMutation {
        if !obstacle.is_gone() {
            return ObstacleMutation::Active;
        }

        self.gap += 1;
        let (min_gap, max_gap) = gap_range(score);
        if self.gap <= draw(rng, min_gap, max_gap) {
            return ObstacleMutation::Waiting;
        }

        obstacle.position = OBSTACLE_SPAWN_COLUMN;
        obstacle.kind = choose_kind(rng, score);

        if obstacle.kind.is_cactus() && percent(rng) < DOUBLE_CACTUS_CHANCE {
            obstacle.is_doubled = true;
            obstacle.second_position = obstacle.position + DOUBLE_CACTUS_OFFSET;
        } else {
            obstacle.is_doubled = false;
            obstacle.second_position = DOUBLE_CACTUS_PARKED;
        }

        self.gap = if percent(rng) < 50 {
            if percent(rng) < 80 {
                0
            } else {
                draw(rng, min_gap + 1, max_gap + 2)
            }
        } else {
            0
        };

        log::trace!("Next gap {} at score {}", self.gap, score);

        ObstacleMutation::Spawned {
            kind: obstacle.kind,
            doubled: obstacle.is_doubled,
        }
    }
}
