//! Buzzer audio
//!
//! The game speaks in plain square-wave tones. Short effects are fire-and-forget;
//! the start melody and game-over jingle are played as note sequences that hold
//! the caller for their full length.

use serde::{Deserialize, Serialize};

use crate::platform::Clock;

/// A single tone request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl Tone {
    pub const fn new(frequency_hz: u32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

/// A tone in a blocking sequence, followed by a hold before the next note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub tone: Tone,
    pub hold_ms: u64,
}

const fn note(frequency_hz: u32, duration_ms: u64, hold_ms: u64) -> Note {
    Note {
        tone: Tone::new(frequency_hz, duration_ms),
        hold_ms,
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Player started ducking
    Duck,
}

impl SoundEffect {
    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::Jump => Tone::new(523, 80),
            SoundEffect::Duck => Tone::new(350, 60),
        }
    }
}

/// Fanfare played when a run starts
pub const START_MELODY: [Note; 8] = [
    note(523, 200, 250),
    note(659, 200, 250),
    note(784, 200, 250),
    note(1047, 300, 350),
    note(784, 200, 250),
    note(659, 200, 250),
    note(523, 200, 250),
    note(392, 300, 350),
];

/// Two falling tones, then a long hold on the final score
pub const GAME_OVER: [Note; 2] = [note(200, 300, 400), note(150, 500, 2000)];

/// Something that can sound a tone
pub trait AudioSink {
    fn play(&mut self, tone: Tone);
}

/// Play a note sequence, blocking on the clock for each note's hold
pub fn play_sequence<A, C>(audio: &mut A, clock: &mut C, notes: &[Note])
where
    A: AudioSink + ?Sized,
    C: Clock + ?Sized,
{
    for note in notes {
        audio.play(note.tone);
        clock.sleep_ms(note.hold_ms);
    }
}

/// Total blocking time of a sequence
pub fn sequence_duration_ms(notes: &[Note]) -> u64 {
    notes.iter().map(|n| n.hold_ms).sum()
}

/// Native audio manager: no buzzer attached, so tones are logged
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Tones actually sounded so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, tone: Tone) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!(
            "Tone {} Hz for {} ms (volume {:.2})",
            tone.frequency_hz,
            tone.duration_ms,
            vol
        );
    }
}

/// Sink that remembers every tone, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub tones: Vec<Tone>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, tone: Tone) {
        self.tones.push(tone);
    }
}
