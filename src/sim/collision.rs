//! Collision detection
//!
//! Only the player's column matters. Jumping clears everything; ducking only
//! gets under birds.

use super::state::{Obstacle, ObstacleKind, PlayerState};
use crate::consts::PLAYER_COLUMN;

/// Does the player hit the obstacle (or its doubled companion) this tick?
pub fn check_collision(player: &PlayerState, obstacle: &Obstacle) -> bool {
    if obstacle.position == PLAYER_COLUMN {
        return match obstacle.kind {
            ObstacleKind::Bird => !player.is_ducking && !player.is_jumping,
            ObstacleKind::SmallCactus | ObstacleKind::BigCactus => !player.is_jumping,
        };
    }

    if obstacle.is_doubled && obstacle.second_position == PLAYER_COLUMN {
        return !player.is_jumping;
    }

    false
}
