//! Player state machine: running, jumping and ducking
//!
//! Jumping and ducking are mutually exclusive. A jump lifts the player to the
//! sky row for exactly `JUMP_DURATION` ticks; a duck lasts as long as the button
//! is held.

use super::state::{GameEvent, PlayerState, VerticalPosition};
use crate::consts::*;

impl PlayerState {
    /// Start and advance jumps
    ///
    /// A jump starts only from the ground, while not already jumping or ducking,
    /// and more than `JUMP_COOLDOWN_MS` after the previous jump started. The tick
    /// that starts a jump also counts as its first frame.
    pub fn handle_jump(&mut self, pressed: bool, now_ms: u64) -> Option<GameEvent> {
        let mut event = None;

        if pressed && !self.is_jumping && !self.is_ducking && self.is_grounded() {
            let cooled_down = self
                .last_jump_ms
                .is_none_or(|last| now_ms.saturating_sub(last) > JUMP_COOLDOWN_MS);
            if cooled_down {
                self.is_jumping = true;
                self.jump_frame = 0;
                self.vertical = VerticalPosition::Up;
                self.last_jump_ms = Some(now_ms);
                event = Some(GameEvent::Jumped);
            }
        }

        if self.is_jumping {
            self.jump_frame += 1;
            if self.jump_frame >= JUMP_DURATION {
                self.is_jumping = false;
                self.vertical = VerticalPosition::Ground;
            }
        }

        event
    }

    /// Duck while held, never mid-jump. Only the rising edge is reported.
    pub fn handle_duck(&mut self, pressed: bool) -> Option<GameEvent> {
        if !pressed {
            self.is_ducking = false;
            return None;
        }
        if self.is_jumping {
            return None;
        }

        let rising = !self.is_ducking;
        self.is_ducking = true;
        rising.then_some(GameEvent::Ducked)
    }

    /// Toggle the run animation frame every `RUN_ANIMATION_MS`
    ///
    /// The timer keeps running while jumping or ducking; only the toggle is
    /// suppressed.
    pub fn update_animation(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_animation_ms) > RUN_ANIMATION_MS {
            if !self.is_jumping && !self.is_ducking {
                self.run_frame = !self.run_frame;
            }
            self.last_animation_ms = now_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_jump_shows_on_sky_row_for_all_but_landing_tick() {
        let mut player = PlayerState::new(0);
        let mut now = 1000;

        // The start tick already counts as the first jump frame
        assert_eq!(player.handle_jump(true, now), Some(GameEvent::Jumped));
        assert_eq!(player.jump_frame, 1);

        let mut sky_frames = 0;
        let mut ticks = 1;
        while player.vertical == VerticalPosition::Up {
            sky_frames += 1;
            now += TICK_MS;
            player.handle_jump(false, now);
            ticks += 1;
            assert!(ticks <= JUMP_DURATION, "jump never landed");
        }

        assert_eq!(sky_frames, JUMP_DURATION - 1);
        assert_eq!(ticks, JUMP_DURATION);
        assert!(!player.is_jumping);
    }

    #[test]
    fn test_jump_cooldown() {
        let mut player = PlayerState::new(0);

        assert!(player.handle_jump(true, 0).is_some());
        // Already airborne, and inside the cooldown
        assert!(player.handle_jump(true, 50).is_none());

        // Force a landing to isolate the cooldown gate
        player.is_jumping = false;
        player.vertical = VerticalPosition::Ground;
        assert!(player.handle_jump(true, 150).is_none());
        assert!(player.handle_jump(true, 200).is_none());
        assert!(player.handle_jump(true, 220).is_some());
    }

    #[test]
    fn test_jump_after_cooldown_requires_ground() {
        let mut player = PlayerState::new(0);
        player.handle_jump(true, 0);

        // Still mid-jump at 220 ms: nothing new starts
        assert!(player.handle_jump(true, 220).is_none());
        assert!(player.is_jumping);
    }

    #[test]
    fn test_duck_rising_edge_only() {
        let mut player = PlayerState::new(0);

        assert_eq!(player.handle_duck(true), Some(GameEvent::Ducked));
        assert_eq!(player.handle_duck(true), None);
        assert!(player.is_ducking);

        assert_eq!(player.handle_duck(false), None);
        assert!(!player.is_ducking);
        assert_eq!(player.handle_duck(true), Some(GameEvent::Ducked));
    }

    #[test]
    fn test_cannot_duck_mid_jump_or_jump_while_ducking() {
        let mut player = PlayerState::new(0);
        player.handle_jump(true, 0);
        assert!(player.handle_duck(true).is_none());
        assert!(!player.is_ducking);

        let mut player = PlayerState::new(0);
        player.handle_duck(true);
        assert!(player.handle_jump(true, 500).is_none());
        assert!(!player.is_jumping);
        assert!(player.is_grounded());
    }

    #[test]
    fn test_animation_frozen_while_ducking() {
        let mut player = PlayerState::new(0);

        player.update_animation(201);
        assert!(player.run_frame);

        player.handle_duck(true);
        player.update_animation(402);
        assert!(player.run_frame);
        assert_eq!(player.last_animation_ms, 402);

        player.handle_duck(false);
        player.update_animation(500);
        assert!(player.run_frame, "200 ms have not passed yet");
        player.update_animation(603);
        assert!(!player.run_frame);
    }

    proptest! {
        #[test]
        fn prop_jump_and_duck_exclusive(inputs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..200)) {
            let mut player = PlayerState::new(0);
            let mut since_jump_start = None;

            for (i, (jump, duck)) in inputs.into_iter().enumerate() {
                let now = i as u64 * TICK_MS;
                if player.handle_jump(jump, now).is_some() {
                    since_jump_start = Some(0);
                }
                player.handle_duck(duck);

                prop_assert!(!(player.is_jumping && player.is_ducking));
                prop_assert_eq!(player.is_jumping, !player.is_grounded());

                if let Some(ticks) = since_jump_start.as_mut() {
                    *ticks += 1;
                    if *ticks == JUMP_DURATION {
                        prop_assert!(player.is_grounded());
                        since_jump_start = None;
                    } else {
                        prop_assert!(!player.is_grounded());
                    }
                }
            }
        }
    }
}
