//! Game session controller
//!
//! Top-level state machine (Idle → Playing → GameOver → Playing ...). Each
//! call to `tick` is one loop iteration: during a run it updates the ambient
//! cycle, stars, animation, jump, duck, obstacle movement, obstacle generation
//! and collision in that order, then hands a complete frame to the display.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::check_collision;
use super::obstacles::ObstacleMutation;
use super::state::{
    AmbientState, DifficultyState, GameEvent, Obstacle, ObstacleGenerator, ObstacleKind,
    PlayerState, RngState, SessionState,
};
use crate::audio::{AudioSink, GAME_OVER, START_MELODY, SoundEffect, play_sequence};
use crate::consts::*;
use crate::platform::{Button, Clock, InputSource};
use crate::renderer::{
    DisplaySink, Frame, GameOverFrame, Glyph, ObstacleSprite, PlayFrame, SkyGlyph, TitleFrame,
    visible_column,
};

/// Button state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub duck: bool,
    pub start: bool,
}

impl TickInput {
    /// Sample every button once
    pub fn sample<I: InputSource + ?Sized>(input: &mut I) -> Self {
        Self {
            jump: input.is_pressed(Button::Jump),
            duck: input.is_pressed(Button::Duck),
            start: input.is_pressed(Button::Start),
        }
    }
}

/// The collaborators a tick talks to
pub struct Peripherals<'a> {
    pub clock: &'a mut dyn Clock,
    pub audio: &'a mut dyn AudioSink,
    pub display: &'a mut dyn DisplaySink,
}

/// Everything that is reset when a run starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub player: PlayerState,
    pub obstacle: Obstacle,
    pub generator: ObstacleGenerator,
    pub difficulty: DifficultyState,
    pub ambient: AmbientState,
}

impl RunState {
    pub fn new(now_ms: u64, high_score: u64) -> Self {
        Self {
            player: PlayerState::new(now_ms),
            obstacle: Obstacle::default(),
            generator: ObstacleGenerator::new(now_ms),
            difficulty: DifficultyState {
                high_score,
                ..Default::default()
            },
            ambient: AmbientState::default(),
        }
    }
}

/// The whole game: session state, the current run and the RNG
pub struct GameSession {
    state: SessionState,
    run: RunState,
    rng_state: RngState,
    rng: Pcg32,
    /// Title screen animation
    title_frame: bool,
    last_title_anim_ms: u64,
    /// When custom glyphs were last (re)loaded during this run
    glyphs_loaded_ms: Option<u64>,
    runs_started: u32,
}

impl GameSession {
    /// Create an idle session with the given RNG seed
    pub fn new(seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            state: SessionState::Idle,
            run: RunState::new(0, 0),
            rng: rng_state.to_rng(),
            rng_state,
            title_frame: false,
            last_title_anim_ms: 0,
            glyphs_loaded_ms: None,
            runs_started: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn player(&self) -> &PlayerState {
        &self.run.player
    }

    pub fn obstacle(&self) -> &Obstacle {
        &self.run.obstacle
    }

    pub fn difficulty(&self) -> &DifficultyState {
        &self.run.difficulty
    }

    pub fn ambient(&self) -> &AmbientState {
        &self.run.ambient
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }

    /// Advance the session by one loop iteration
    pub fn tick(&mut self, input: &TickInput, io: &mut Peripherals<'_>) {
        let now = io.clock.now_ms();

        match self.state {
            SessionState::Idle => {
                self.update_title(now);
                io.display.present(&self.title_frame());
                if input.start {
                    self.start_run(io);
                }
            }
            SessionState::Playing => self.tick_playing(input, now, io),
            SessionState::GameOver => {
                io.display.present(&self.game_over_frame());
                if input.start {
                    self.start_run(io);
                }
            }
        }
    }

    /// Fanfare, fresh run, short settle delay. Blocks for all of it.
    fn start_run(&mut self, io: &mut Peripherals<'_>) {
        play_sequence(&mut *io.audio, &mut *io.clock, &START_MELODY);
        self.reset_run(io.clock.now_ms());
        io.clock.sleep_ms(START_SETTLE_MS);
        self.state = SessionState::Playing;
        self.runs_started += 1;
        log::info!(
            "Run {} started (high score {})",
            self.runs_started,
            self.run.difficulty.high_score
        );
    }

    /// Clear all per-run state; the high score carries over
    pub fn reset_run(&mut self, now_ms: u64) {
        self.run = RunState::new(now_ms, self.run.difficulty.high_score);
        self.glyphs_loaded_ms = None;
    }

    fn tick_playing(&mut self, input: &TickInput, now: u64, io: &mut Peripherals<'_>) {
        let run = &mut self.run;
        let mut events: Vec<GameEvent> = Vec::new();

        run.ambient.update(run.difficulty.score);
        run.ambient.update_star_timer();
        run.player.update_animation(now);
        events.extend(run.player.handle_jump(input.jump, now));
        events.extend(run.player.handle_duck(input.duck));

        let (_, speed_up) = run
            .generator
            .move_obstacles(&mut run.obstacle, &mut run.difficulty, now);
        events.extend(speed_up);

        if let ObstacleMutation::Spawned { kind, doubled } =
            run.generator
                .advance(&mut run.obstacle, run.difficulty.score, &mut self.rng)
        {
            events.push(GameEvent::Spawned { kind, doubled });
        }

        if check_collision(&run.player, &run.obstacle) {
            events.push(GameEvent::Collision);
        }

        for event in events {
            match event {
                GameEvent::Jumped => io.audio.play(SoundEffect::Jump.tone()),
                GameEvent::Ducked => io.audio.play(SoundEffect::Duck.tone()),
                GameEvent::Collision => {
                    self.game_over(io);
                    return;
                }
                GameEvent::Spawned { kind, doubled } => {
                    log::debug!("Spawned {:?} (doubled: {})", kind, doubled);
                }
                GameEvent::SpeedUp { speed } => {
                    log::info!(
                        "Speed up to {} at score {}",
                        speed,
                        self.run.difficulty.score
                    );
                }
            }
        }

        let frame = self.play_frame(now);
        io.display.present(&frame);
    }

    fn game_over(&mut self, io: &mut Peripherals<'_>) {
        self.state = SessionState::GameOver;

        let difficulty = &self.run.difficulty;
        if difficulty.score > 0 && difficulty.score == difficulty.high_score {
            log::info!("Game over: new high score {}", difficulty.score);
        } else {
            log::info!(
                "Game over: score {} (high score {})",
                difficulty.score,
                difficulty.high_score
            );
        }

        io.display.present(&self.game_over_frame());
        play_sequence(&mut *io.audio, &mut *io.clock, &GAME_OVER);
    }

    fn update_title(&mut self, now: u64) {
        if now.saturating_sub(self.last_title_anim_ms) > TITLE_ANIMATION_MS {
            self.title_frame = !self.title_frame;
            self.last_title_anim_ms = now;
        }
    }

    fn title_frame(&self) -> Frame {
        Frame::Title(TitleFrame {
            dino: if self.title_frame {
                Glyph::DinoRun1
            } else {
                Glyph::DinoRun2
            },
        })
    }

    fn game_over_frame(&self) -> Frame {
        Frame::GameOver(GameOverFrame {
            score: self.run.difficulty.score,
            high_score: self.run.difficulty.high_score,
        })
    }

    fn play_frame(&mut self, now: u64) -> Frame {
        let reload_glyphs = self
            .glyphs_loaded_ms
            .is_none_or(|loaded| now.saturating_sub(loaded) > GLYPH_REFRESH_MS);
        if reload_glyphs {
            self.glyphs_loaded_ms = Some(now);
        }

        let run = &self.run;
        let stars = run.ambient.draw_stars(&mut self.rng);

        let player = if run.player.is_jumping {
            Glyph::DinoJump
        } else if run.player.is_ducking {
            Glyph::DinoDuck1
        } else if run.player.run_frame {
            Glyph::DinoRun1
        } else {
            Glyph::DinoRun2
        };

        let mut obstacles = Vec::with_capacity(2);
        if let Some(column) = visible_column(run.obstacle.position) {
            let glyph = match run.obstacle.kind {
                ObstacleKind::SmallCactus => Glyph::SmallCactus,
                ObstacleKind::BigCactus => Glyph::BigCactus,
                ObstacleKind::Bird => Glyph::Bird,
            };
            obstacles.push(ObstacleSprite { glyph, column });
        }
        if run.obstacle.is_doubled {
            if let Some(column) = visible_column(run.obstacle.second_position) {
                obstacles.push(ObstacleSprite {
                    glyph: Glyph::SmallCactus,
                    column,
                });
            }
        }

        Frame::Play(PlayFrame {
            sky: SkyGlyph::for_phase(run.ambient.transition_phase),
            phase: run.ambient.transition_phase,
            stars,
            score: run.difficulty.score,
            high_score: run.difficulty.high_score,
            player,
            player_row: run.player.vertical.row(),
            obstacles,
            reload_glyphs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingAudio, Tone, sequence_duration_ms};
    use crate::platform::ManualClock;
    use crate::renderer::RecordingDisplay;
    use proptest::prelude::*;

    struct Harness {
        session: GameSession,
        clock: ManualClock,
        audio: RecordingAudio,
        display: RecordingDisplay,
    }

    impl Harness {
        fn new(seed: u64) -> Self {
            Self {
                session: GameSession::new(seed),
                clock: ManualClock::new(0),
                audio: RecordingAudio::default(),
                display: RecordingDisplay::default(),
            }
        }

        /// One loop iteration followed by the fixed tick sleep
        fn tick(&mut self, input: TickInput) {
            let mut io = Peripherals {
                clock: &mut self.clock,
                audio: &mut self.audio,
                display: &mut self.display,
            };
            self.session.tick(&input, &mut io);
            self.clock.advance(TICK_MS);
        }

        fn idle_tick(&mut self) {
            self.tick(TickInput::default());
        }

        fn start(&mut self) {
            self.tick(TickInput {
                start: true,
                ..Default::default()
            });
        }

        /// Tick without input until the run ends
        fn run_until_game_over(&mut self) {
            for _ in 0..10_000 {
                if self.session.state() == SessionState::GameOver {
                    return;
                }
                self.idle_tick();
            }
            panic!("run never ended");
        }
    }

    struct Held(Vec<Button>);

    impl InputSource for Held {
        fn is_pressed(&mut self, button: Button) -> bool {
            self.0.contains(&button)
        }
    }

    #[test]
    fn test_sample_reads_each_button() {
        let input = TickInput::sample(&mut Held(vec![Button::Duck, Button::Start]));
        assert_eq!(
            input,
            TickInput {
                jump: false,
                duck: true,
                start: true
            }
        );
    }

    #[test]
    fn test_idle_shows_title_until_start() {
        let mut h = Harness::new(1);
        h.idle_tick();
        h.idle_tick();

        assert_eq!(h.session.state(), SessionState::Idle);
        assert!(matches!(h.display.last(), Some(Frame::Title(_))));
        assert!(h.audio.tones.is_empty());
    }

    #[test]
    fn test_title_dino_animates() {
        let mut h = Harness::new(1);
        let mut dinos = Vec::new();
        for _ in 0..30 {
            h.idle_tick();
            if let Some(Frame::Title(title)) = h.display.last() {
                dinos.push(title.dino);
            }
        }
        assert!(dinos.contains(&Glyph::DinoRun1));
        assert!(dinos.contains(&Glyph::DinoRun2));
    }

    #[test]
    fn test_start_plays_melody_and_blocks() {
        let mut h = Harness::new(1);
        h.start();

        assert_eq!(h.session.state(), SessionState::Playing);
        assert_eq!(h.audio.tones.len(), START_MELODY.len());
        assert_eq!(
            h.clock.slept_ms,
            sequence_duration_ms(&START_MELODY) + START_SETTLE_MS
        );
        assert_eq!(h.session.runs_started(), 1);
    }

    #[test]
    fn test_first_obstacle_reaches_player_without_jumping() {
        let mut h = Harness::new(5);
        h.start();
        h.run_until_game_over();

        // The opening cactus starts at column 25 and hits at column 2
        assert_eq!(h.session.obstacle().position, PLAYER_COLUMN);
        assert_eq!(h.session.difficulty().score, 23);
        assert_eq!(h.session.difficulty().high_score, 23);
        assert!(matches!(
            h.display.last(),
            Some(Frame::GameOver(GameOverFrame { score: 23, .. }))
        ));
        let tail: Vec<Tone> = h.audio.tones.iter().rev().take(2).rev().copied().collect();
        assert_eq!(tail, vec![Tone::new(200, 300), Tone::new(150, 500)]);
    }

    #[test]
    fn test_jump_clears_cactus() {
        let mut h = Harness::new(5);
        h.start();
        while h.session.obstacle().position > 4 {
            h.idle_tick();
        }

        h.tick(TickInput {
            jump: true,
            ..Default::default()
        });
        assert!(h.session.player().is_jumping);
        assert_eq!(h.audio.tones.last(), Some(&SoundEffect::Jump.tone()));

        while h.session.obstacle().position >= PLAYER_COLUMN {
            h.idle_tick();
            assert_eq!(h.session.state(), SessionState::Playing);
        }
    }

    #[test]
    fn test_jump_frames_on_sky_row() {
        let mut h = Harness::new(5);
        h.start();
        let first = h.display.frames.len();

        h.tick(TickInput {
            jump: true,
            ..Default::default()
        });
        for _ in 0..20 {
            h.idle_tick();
        }

        let sky_frames = h.display.frames[first..]
            .iter()
            .filter(|frame| matches!(frame, Frame::Play(play) if play.player_row == SKY_ROW))
            .count();
        assert_eq!(sky_frames, (JUMP_DURATION - 1) as usize);
        assert_eq!(h.session.state(), SessionState::Playing);
    }

    #[test]
    fn test_duck_plays_once_per_press() {
        let mut h = Harness::new(5);
        h.start();
        let before = h.audio.tones.len();

        let duck = TickInput {
            duck: true,
            ..Default::default()
        };
        h.tick(duck);
        h.tick(duck);
        h.tick(duck);

        assert!(h.session.player().is_ducking);
        assert_eq!(h.audio.tones.len(), before + 1);
        assert!(matches!(
            h.display.last(),
            Some(Frame::Play(PlayFrame { player: Glyph::DinoDuck1, .. }))
        ));
    }

    #[test]
    fn test_game_over_ignores_jump_and_duck() {
        let mut h = Harness::new(5);
        h.start();
        h.run_until_game_over();
        let tones = h.audio.tones.len();

        h.tick(TickInput {
            jump: true,
            duck: true,
            start: false,
        });

        assert_eq!(h.session.state(), SessionState::GameOver);
        assert_eq!(h.audio.tones.len(), tones);
        assert!(matches!(h.display.last(), Some(Frame::GameOver(_))));
    }

    #[test]
    fn test_restart_resets_run_and_keeps_high_score() {
        let mut h = Harness::new(5);
        h.start();
        h.run_until_game_over();
        let high_score = h.session.difficulty().high_score;
        assert!(high_score > 0);

        h.start();

        assert_eq!(h.session.state(), SessionState::Playing);
        assert_eq!(h.session.difficulty().score, 0);
        assert_eq!(h.session.difficulty().game_speed, START_SPEED);
        assert_eq!(h.session.difficulty().high_score, high_score);
        assert_eq!(h.session.obstacle().position, OBSTACLE_START_COLUMN);
        assert!(!h.session.obstacle().is_doubled);
        assert_eq!(h.session.player(), &PlayerState::new(h.session.run().generator.last_move_ms));
        assert_eq!(h.session.runs_started(), 2);
    }

    #[test]
    fn test_glyph_reload_on_first_frame_and_every_thirty_seconds() {
        let mut h = Harness::new(5);
        h.start();
        h.idle_tick();
        h.idle_tick();

        let reloads: Vec<bool> = h
            .display
            .frames
            .iter()
            .filter_map(|f| match f {
                Frame::Play(play) => Some(play.reload_glyphs),
                _ => None,
            })
            .collect();
        assert_eq!(reloads, vec![true, false]);

        // At most one column moves per tick, so the cactus is still far off
        h.clock.advance(GLYPH_REFRESH_MS);
        h.idle_tick();
        assert!(matches!(
            h.display.last(),
            Some(Frame::Play(PlayFrame { reload_glyphs: true, .. }))
        ));
    }

    #[test]
    fn test_same_seed_same_run() {
        let script: Vec<TickInput> = (0..400)
            .map(|i| TickInput {
                jump: i % 7 == 0,
                duck: i % 11 < 3,
                start: i % 97 == 0,
            })
            .collect();

        let mut a = Harness::new(2024);
        let mut b = Harness::new(2024);
        for input in &script {
            a.tick(*input);
            b.tick(*input);
        }

        assert_eq!(a.session.state(), b.session.state());
        assert_eq!(a.session.run(), b.session.run());
        assert_eq!(a.display.frames, b.display.frames);
        assert_eq!(a.audio.tones, b.audio.tones);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_run_stays_in_bounds(seed in any::<u64>(), inputs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..300)) {
            let mut h = Harness::new(seed);
            h.start();
            let mut last_speed = START_SPEED;
            let mut last_high = 0;

            for (jump, duck) in inputs {
                h.tick(TickInput { jump, duck, start: false });

                let player = h.session.player();
                prop_assert!(!(player.is_jumping && player.is_ducking));

                let difficulty = h.session.difficulty();
                prop_assert!(difficulty.game_speed >= last_speed);
                prop_assert!(difficulty.game_speed <= MAX_SPEED);
                prop_assert!(difficulty.high_score >= last_high);
                prop_assert!(difficulty.high_score >= difficulty.score);
                last_speed = difficulty.game_speed;
                last_high = difficulty.high_score;

                if let Some(Frame::Play(play)) = h.display.last() {
                    prop_assert!(play.obstacles.len() <= 2);
                    prop_assert!(play.obstacles.iter().all(|o| i32::from(o.column) < COLS));
                    prop_assert!(play.phase <= 10);
                }

                if h.session.state() == SessionState::GameOver {
                    break;
                }
            }
        }
    }
}
